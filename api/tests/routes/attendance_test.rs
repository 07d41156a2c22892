#[cfg(test)]
mod tests {
    use crate::helpers::{authed_request, get_json_body, make_app, seed_student};
    use api::auth::{Role, generate_jwt};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    fn student_token() -> String {
        generate_jwt("a@x.com", Role::Student).0
    }

    #[tokio::test]
    #[serial]
    async fn test_get_me_returns_roster_entry() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        let req = authed_request("GET", "/api/me", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["full_name"], "Asha Patil");
        assert_eq!(json["data"]["roll_no"], "H-101");
    }

    #[tokio::test]
    #[serial]
    async fn test_me_requires_student_role() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        let (parent_token, _) = generate_jwt("parent.a@x.com", Role::Parent);
        let req = authed_request("GET", "/api/me/attendance", &parent_token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Student access required");
    }

    #[tokio::test]
    #[serial]
    async fn test_token_for_unrostered_email() {
        let ctx = make_app().await;
        // Roster is empty; the token's email resolves to nothing.
        let token = student_token();

        let req = authed_request("POST", "/api/me/attendance/check-in", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "No student record found for this account.");
    }

    #[tokio::test]
    #[serial]
    async fn test_status_is_unknown_before_any_event() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"]["state"], "unknown");
        assert_eq!(json["data"]["label"], "Unknown");
        assert_eq!(json["data"]["records"].as_array().unwrap().len(), 0);
    }

    /// The end-to-end scenario: first event is a check-out, then a
    /// check-in, then a second check-in is rejected.
    #[tokio::test]
    #[serial]
    async fn test_check_out_then_in_then_repeat_fails() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        // Check out with a reason and an expected return
        let payload = json!({"reason": "Library", "expected_return": "18:00"});
        let req = authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .starts_with("Checked OUT successfully at ")
        );
        assert_eq!(json["data"]["direction"], "check_out");
        assert_eq!(json["data"]["reason"], "Library");
        assert_eq!(json["data"]["expected_return"], "18:00");

        // Status shows the reason as the label
        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"]["state"], "checked_out");
        assert_eq!(json["data"]["label"], "Library");

        // Check back in
        let req = authed_request("POST", "/api/me/attendance/check-in", &token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["direction"], "check_in");

        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"]["state"], "checked_in");
        assert_eq!(json["data"]["label"], "HOSTEL");

        // A second check-in is rejected and appends nothing
        let req = authed_request("POST", "/api/me/attendance/check-in", &token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = get_json_body(response).await;
        assert_eq!(
            json["message"],
            "You are already checked in. Please check out before checking in again."
        );

        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["records"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    #[serial]
    async fn test_double_check_out_is_rejected() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        let payload = json!({"reason": "Mess", "expected_return": "20:00"});
        let req = authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "You are already checked out. Cannot check out again.");
    }

    #[tokio::test]
    #[serial]
    async fn test_check_out_requires_expected_return() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        for payload in [
            json!({"reason": "Library"}),
            json!({"reason": "Library", "expected_return": ""}),
            json!({"reason": "Library", "expected_return": "   "}),
        ] {
            let req =
                authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
            let response = ctx.app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let json = get_json_body(response).await;
            assert_eq!(
                json["message"],
                "Expected return time is required for checking out."
            );
        }

        // Nothing was appended
        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["records"].as_array().unwrap().len(), 0);
        assert_eq!(json["data"]["status"]["state"], "unknown");
    }

    #[tokio::test]
    #[serial]
    async fn test_check_out_other_reason_substitution() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        let payload = json!({
            "reason": "Other",
            "other_reason": "Dentist appointment",
            "expected_return": "17:00"
        });
        let req = authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["reason"], "Dentist appointment");

        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["label"], "Dentist appointment");
    }

    #[tokio::test]
    #[serial]
    async fn test_check_out_without_reason_shows_out() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = student_token();

        let payload = json!({"expected_return": "19:00"});
        let req = authed_request("POST", "/api/me/attendance/check-out", &token, Some(&payload));
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let req = authed_request("GET", "/api/me/attendance", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"]["state"], "checked_out");
        assert_eq!(json["data"]["label"], "OUT");
    }
}
