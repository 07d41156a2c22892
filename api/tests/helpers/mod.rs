use api::auth::otp::InMemoryOtpStore;
use api::routes::routes;
use api::services::email::Mailer;
use api::state::AppState;
use axum::{Router, body::Body as AxumBody, http::Request, response::Response};
use common::config::AppConfig;
use db::models::student::Model as StudentModel;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Mail double recording every OTP dispatch so tests can read the code
/// instead of talking to an SMTP relay.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send_otp(&self, to: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_owned(), code.to_owned()));
        Ok(())
    }
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// The code from the most recent dispatch.
    pub fn last_code(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, code)| code.clone())
            .expect("no OTP was sent")
    }
}

pub fn init_test_config() {
    AppConfig::set_jwt_secret("integration_test_secret_key");
    AppConfig::set_jwt_duration_minutes(60u64);
    AppConfig::set_admin_username("warden");
    AppConfig::set_admin_password("hostelpass");
    AppConfig::set_otp_expiry_minutes(10u64);
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

/// Builds the full router over a fresh in-memory database with the mail
/// collaborator stubbed out.
pub async fn make_app() -> TestApp {
    init_test_config();

    let db = db::test_utils::setup_test_db().await;
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(
        db,
        Arc::new(InMemoryOtpStore::default()),
        mailer.clone(),
    );
    let app = Router::new().nest("/api", routes(state.clone()));

    TestApp { app, state, mailer }
}

pub async fn seed_student(db: &DatabaseConnection) -> StudentModel {
    StudentModel::create(
        db,
        "Asha Patil",
        "H-101",
        "XII-A",
        "a@x.com",
        "parent.a@x.com",
    )
    .await
    .expect("seed student")
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<AxumBody> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(AxumBody::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<&Value>,
) -> Request<AxumBody> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    match body {
        Some(v) => builder
            .header("Content-Type", "application/json")
            .body(AxumBody::from(v.to_string()))
            .unwrap(),
        None => builder.body(AxumBody::empty()).unwrap(),
    }
}
