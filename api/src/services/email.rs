//! Email dispatch for the OTP login flow.
//!
//! Sends through Gmail SMTP using the `lettre` crate, configured from
//! `GMAIL_USERNAME` / `GMAIL_APP_PASSWORD`. The transport is built lazily on
//! first use. Dispatch is fire-and-forget from the caller's perspective:
//! the authenticator logs failures and carries on.

use async_trait::async_trait;
use common::config;
use lettre::{
    AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header},
    transport::smtp::{
        AsyncSmtpTransport,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use once_cell::sync::Lazy;

/// Outgoing-notification collaborator, injectable so tests can record
/// dispatches instead of talking to an SMTP relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Global SMTP client instance configured for Gmail.
static SMTP_CLIENT: Lazy<AsyncSmtpTransport<Tokio1Executor>> = Lazy::new(|| {
    let username = config::gmail_username();
    let password = config::gmail_app_password();

    let tls_parameters = TlsParameters::new("smtp.gmail.com".to_string())
        .expect("Failed to create TLS parameters");

    AsyncSmtpTransport::<Tokio1Executor>::relay("smtp.gmail.com")
        .expect("Failed to create SMTP transport")
        .port(587)
        .tls(Tls::Required(tls_parameters))
        .credentials(Credentials::new(username, password))
        .build()
});

/// Production mailer sending real OTP emails through the Gmail relay.
#[derive(Debug, Default)]
pub struct SmtpMailer;

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let from_email = config::gmail_username();
        let from_name = config::email_from_name();

        let email = Message::builder()
            .from(format!("{} <{}>", from_name, from_email).parse()?)
            .to(to.parse()?)
            .subject(format!("Your OTP for {} Login", from_name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(format!(
                                "Dear User,\n\n\
                                Your OTP is {}\n\n\
                                The code is valid for {} minutes and can be used once.\n\n\
                                If you did not request this login, please ignore this email.\n\n\
                                Regards,\n\
                                {}",
                                code,
                                config::otp_expiry_minutes(),
                                from_name
                            )),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(format!(
                                "<html>\
                                <body>\
                                <p>Dear User,</p>\
                                <p>Your OTP is <strong>{}</strong></p>\
                                <p>The code is valid for {} minutes and can be used once.</p>\
                                <p>If you did not request this login, please ignore this email.</p>\
                                <p>Regards,<br>\
                                {}</p>\
                                </body>\
                                </html>",
                                code,
                                config::otp_expiry_minutes(),
                                from_name
                            )),
                    ),
            )?;

        SMTP_CLIENT.send(email).await?;
        Ok(())
    }
}
