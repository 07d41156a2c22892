#[cfg(test)]
mod tests {
    use crate::helpers::{authed_request, get_json_body, make_app, seed_student};
    use api::auth::{Role, generate_jwt};
    use axum::http::StatusCode;
    use db::models::attendance_event::Model as EventModel;
    use serial_test::serial;
    use tower::ServiceExt;

    fn parent_token() -> String {
        generate_jwt("parent.a@x.com", Role::Parent).0
    }

    #[tokio::test]
    #[serial]
    async fn test_child_view_requires_parent_role() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;

        let (student_token, _) = generate_jwt("a@x.com", Role::Student);
        let req = authed_request("GET", "/api/me/child", &student_token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Parent access required");
    }

    #[tokio::test]
    #[serial]
    async fn test_parent_with_no_child_is_terminal() {
        let ctx = make_app().await;
        // Roster is empty for this parent.
        let token = parent_token();

        let req = authed_request("GET", "/api/me/child", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "No student found for this parent.");
    }

    #[tokio::test]
    #[serial]
    async fn test_child_with_no_events_is_unknown() {
        let ctx = make_app().await;
        seed_student(ctx.state.db()).await;
        let token = parent_token();

        let req = authed_request("GET", "/api/me/child", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["student"]["full_name"], "Asha Patil");
        assert_eq!(json["data"]["current_status"], "Unknown");
        assert_eq!(json["data"]["records"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn test_child_status_follows_latest_event() {
        let ctx = make_app().await;
        let student = seed_student(ctx.state.db()).await;
        let token = parent_token();
        let db = ctx.state.db();

        // Checked out for the library: the reason is the displayed status
        EventModel::check_out(db, student.id, Some("Library"), None, Some("18:00"))
            .await
            .unwrap();

        let req = authed_request("GET", "/api/me/child", &token, None);
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["current_status"], "Library");
        assert_eq!(json["data"]["records"].as_array().unwrap().len(), 1);

        // Back in the hostel
        EventModel::check_in(db, student.id).await.unwrap();

        let req = authed_request("GET", "/api/me/child", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["current_status"], "HOSTEL");

        let records = json["data"]["records"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["direction"], "check_out");
        assert_eq!(records[1]["direction"], "check_in");
    }

    #[tokio::test]
    #[serial]
    async fn test_first_matching_child_wins_for_shared_parent_email() {
        let ctx = make_app().await;
        let db = ctx.state.db();
        let first = seed_student(db).await;

        // Second child linked to the same parent email
        db::models::student::Model::create(
            db,
            "Vikram Patil",
            "H-109",
            "X-C",
            "v@x.com",
            "parent.a@x.com",
        )
        .await
        .unwrap();

        let token = parent_token();
        let req = authed_request("GET", "/api/me/child", &token, None);
        let response = ctx.app.oneshot(req).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["student"]["id"], first.id);
    }
}
