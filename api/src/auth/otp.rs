//! One-time-passcode login flow for students and parents.
//!
//! Pending codes live only in process memory: a restart clears them, and a
//! successful verification consumes them. At most one code is pending per
//! (role, email) pair; a new request overwrites the previous code.

use chrono::{DateTime, Duration, Utc};
use common::config;
use rand::Rng;
use sea_orm::{DatabaseConnection, DbErr};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::auth::claims::Role;
use crate::services::email::Mailer;
use db::models::student::Model as Student;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Invalid email for {0}. Please try again.")]
    UnknownIdentity(Role),
    #[error("No pending login for this email. Please log in again.")]
    NoPendingRequest,
    #[error("Incorrect OTP. Please try again.")]
    IncorrectCode,
    #[error("OTP has expired. Please request a new one.")]
    ExpiredCode,
    #[error("Student roster is unavailable. Please check your setup.")]
    Roster(#[from] DbErr),
}

/// A generated code awaiting verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOtp {
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl PendingOtp {
    pub fn new(code: String) -> Self {
        Self {
            code,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, max_age: Duration) -> bool {
        Utc::now() - self.created_at > max_age
    }
}

/// Outcome of an atomic lookup-compare-consume against the store.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Nothing pending for the identity.
    NoPending,
    /// A code is pending but does not match; it stays stored.
    Mismatch,
    /// The code matched and has been removed (single-use).
    Consumed(PendingOtp),
}

/// Key-value store for pending codes, keyed by (role, email).
///
/// Injected so tests can substitute doubles and so a future deployment can
/// swap in an external store without touching the flow.
pub trait OtpStore: Send + Sync {
    /// Stores a code for the identity, replacing any previous one.
    fn put(&self, role: Role, email: &str, otp: PendingOtp);

    /// Atomically compares the submitted code and consumes it on a match.
    fn consume(&self, role: Role, email: &str, submitted: &str) -> ConsumeOutcome;
}

/// Process-memory store. The map mutex makes each operation atomic, so a
/// racing double-verify admits exactly one winner.
#[derive(Default)]
pub struct InMemoryOtpStore {
    entries: Mutex<HashMap<(Role, String), PendingOtp>>,
}

impl OtpStore for InMemoryOtpStore {
    fn put(&self, role: Role, email: &str, otp: PendingOtp) {
        let mut entries = self.entries.lock().expect("OTP store lock poisoned");
        entries.insert((role, email.to_owned()), otp);
    }

    fn consume(&self, role: Role, email: &str, submitted: &str) -> ConsumeOutcome {
        let key = (role, email.to_owned());
        let mut entries = self.entries.lock().expect("OTP store lock poisoned");
        let matches = match entries.get(&key) {
            None => return ConsumeOutcome::NoPending,
            Some(pending) => pending.code == submitted,
        };
        if !matches {
            return ConsumeOutcome::Mismatch;
        }
        let pending = entries.remove(&key).expect("entry vanished under lock");
        ConsumeOutcome::Consumed(pending)
    }
}

/// Uniform-random 4-digit numeric code. Collisions across identities are
/// allowed.
fn generate_code() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Marker handed back after a successful OTP request; the client presents
/// the same (role, email) pair at the verify step.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PendingLogin {
    pub role: Role,
    pub email: String,
}

/// Drives the request/verify flow against the roster, the pending-code
/// store, and the mail collaborator.
pub struct Authenticator<'a> {
    db: &'a DatabaseConnection,
    store: &'a dyn OtpStore,
    mailer: &'a dyn Mailer,
}

impl<'a> Authenticator<'a> {
    pub fn new(db: &'a DatabaseConnection, store: &'a dyn OtpStore, mailer: &'a dyn Mailer) -> Self {
        Self { db, store, mailer }
    }

    /// Validates the identity against the roster, stores a fresh code, and
    /// dispatches it by email.
    ///
    /// Mail dispatch is fire-and-forget: failures are logged and the
    /// request still succeeds. No mail is sent for unknown identities.
    pub async fn request_otp(&self, role: Role, email: &str) -> Result<PendingLogin, OtpError> {
        let registered = match role {
            Role::Student => Student::find_by_student_email(self.db, email)
                .await?
                .is_some(),
            Role::Parent => Student::find_by_parent_email(self.db, email).await?.is_some(),
            // Admins authenticate with the configured credential pair.
            Role::Admin => false,
        };
        if !registered {
            return Err(OtpError::UnknownIdentity(role));
        }

        let code = generate_code();
        self.store.put(role, email, PendingOtp::new(code.clone()));

        if let Err(e) = self.mailer.send_otp(email, &code).await {
            tracing::warn!(email, error = %e, "Failed to send OTP email");
        }

        Ok(PendingLogin {
            role,
            email: email.to_owned(),
        })
    }

    /// Verifies a submitted code. Matching codes are consumed (single-use);
    /// mismatches leave the stored code in place.
    pub fn verify_otp(&self, role: Role, email: &str, submitted: &str) -> Result<(), OtpError> {
        match self.store.consume(role, email, submitted.trim()) {
            ConsumeOutcome::NoPending => Err(OtpError::NoPendingRequest),
            ConsumeOutcome::Mismatch => Err(OtpError::IncorrectCode),
            ConsumeOutcome::Consumed(pending) => {
                let max_age = Duration::minutes(config::otp_expiry_minutes() as i64);
                if pending.is_expired(max_age) {
                    Err(OtpError::ExpiredCode)
                } else {
                    Ok(())
                }
            }
        }
    }
}
