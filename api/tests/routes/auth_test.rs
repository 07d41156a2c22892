#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, json_request, make_app, seed_student};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn test_admin_login_success() {
        let ctx = make_app().await;

        let payload = json!({"username": "warden", "password": "hostelpass"});
        let req = json_request("POST", "/api/auth/login", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Login successful! Welcome, Admin.");
        assert_eq!(json["data"]["role"], "admin");
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json["data"]["expires_at"].as_str().is_some());
    }

    #[tokio::test]
    #[serial]
    async fn test_admin_login_wrong_password() {
        let ctx = make_app().await;

        let payload = json!({"username": "warden", "password": "wrong"});
        let req = json_request("POST", "/api/auth/login", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid admin credentials. Please try again.");
    }

    #[tokio::test]
    #[serial]
    async fn test_admin_login_missing_password() {
        let ctx = make_app().await;

        let payload = json!({"username": "warden", "password": ""});
        let req = json_request("POST", "/api/auth/login", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("Please enter the admin password.")
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_request_otp_unknown_email_sends_nothing() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        let payload = json!({"role": "student", "email": "stranger@x.com"});
        let req = json_request("POST", "/api/auth/request-otp", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid email for Student. Please try again.");
        assert!(ctx.mailer.sent().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_request_otp_role_and_email_must_match() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        // A parent email is not a student identity.
        let payload = json!({"role": "student", "email": "parent.a@x.com"});
        let req = json_request("POST", "/api/auth/request-otp", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.mailer.sent().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_request_otp_rejects_malformed_email() {
        let ctx = make_app().await;

        let payload = json!({"role": "student", "email": "not-an-email"});
        let req = json_request("POST", "/api/auth/request-otp", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert!(json["message"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    #[serial]
    async fn test_otp_flow_round_trip() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        // Request a code
        let payload = json!({"role": "student", "email": "a@x.com"});
        let req = json_request("POST", "/api/auth/request-otp", &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "OTP sent to your email. Please check your inbox.");
        assert_eq!(json["data"]["email"], "a@x.com");

        let sent = ctx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@x.com");
        let code = ctx.mailer.last_code();

        // Wrong code is rejected and the stored one survives
        let payload = json!({"role": "student", "email": "a@x.com", "code": "0000"});
        let req = json_request("POST", "/api/auth/verify-otp", &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Incorrect OTP. Please try again.");

        // Correct code issues a token
        let payload = json!({"role": "student", "email": "a@x.com", "code": code});
        let req = json_request("POST", "/api/auth/verify-otp", &payload);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["role"], "student");
        assert!(json["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

        // Single-use: the same code fails afterwards
        let payload = json!({"role": "student", "email": "a@x.com", "code": code});
        let req = json_request("POST", "/api/auth/verify-otp", &payload);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "No pending login for this email. Please log in again.");
    }

    #[tokio::test]
    #[serial]
    async fn test_verify_otp_without_request() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        let payload = json!({"role": "student", "email": "a@x.com", "code": "1234"});
        let req = json_request("POST", "/api/auth/verify-otp", &payload);

        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "No pending login for this email. Please log in again.");
    }

    #[tokio::test]
    #[serial]
    async fn test_new_request_overwrites_pending_code() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        let payload = json!({"role": "parent", "email": "parent.a@x.com"});
        let req = json_request("POST", "/api/auth/request-otp", &payload);
        ctx.app.clone().oneshot(req).await.unwrap();
        let first = ctx.mailer.last_code();

        let req = json_request("POST", "/api/auth/request-otp", &payload);
        ctx.app.clone().oneshot(req).await.unwrap();
        let second = ctx.mailer.last_code();

        assert_eq!(ctx.mailer.sent().len(), 2);

        // The replaced code no longer verifies (unless the random draw
        // collided, in which case it IS the pending code).
        if first != second {
            let payload =
                json!({"role": "parent", "email": "parent.a@x.com", "code": first});
            let req = json_request("POST", "/api/auth/verify-otp", &payload);
            let response = ctx.app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let payload = json!({"role": "parent", "email": "parent.a@x.com", "code": second});
        let req = json_request("POST", "/api/auth/verify-otp", &payload);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
