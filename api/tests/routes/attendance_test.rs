#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{make_test_app, send, token_for};
    use crate::routes::fixtures::setup;

    #[tokio::test]
    async fn marker_records_then_duplicate_is_409() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let token = token_for(ctx.marker.id);
        let body = json!({
            "session_id": ctx.session.id,
            "user_id": ctx.member.id,
            "status": "present"
        });

        let (status, json) =
            send(&app, "POST", "/api/attendance", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["user_id"], ctx.member.id);
        assert_eq!(json["data"]["status"], "present");
        assert_eq!(json["data"]["attendance_type"], "regular");
        assert_eq!(json["data"]["timestamp"], "2026-01-16T13:00:00+07:00");

        let (status, json) = send(&app, "POST", "/api/attendance", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "already_marked");
    }

    #[tokio::test]
    async fn plain_member_is_forbidden() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&token_for(ctx.member.id)),
            Some(json!({
                "session_id": ctx.session.id,
                "user_id": ctx.marker.id,
                "status": "present"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "forbidden");
    }

    #[tokio::test]
    async fn locked_session_is_403_session_locked() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);

        let uri = format!("/api/sessions/{}/lock", ctx.session.id);
        let (status, _) = send(&app, "POST", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&admin),
            Some(json!({
                "session_id": ctx.session.id,
                "user_id": ctx.member.id,
                "status": "late"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "session_locked");
    }

    #[tokio::test]
    async fn core_mark_on_member_is_invalid_target() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/core",
            Some(&admin),
            Some(json!({
                "session_id": ctx.session.id,
                "user_id": ctx.member.id,
                "status": "present"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "invalid_target");

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/core",
            Some(&admin),
            Some(json!({
                "session_id": ctx.session.id,
                "user_id": ctx.ketua.id,
                "status": "present"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["attendance_type"], "core");
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&token_for(ctx.admin.id)),
            Some(json!({ "session_id": 999, "user_id": ctx.member.id, "status": "present" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "session 999 not found");
    }

    #[tokio::test]
    async fn malformed_input_is_400() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&admin),
            Some(json!({ "session_id": ctx.session.id, "user_id": ctx.member.id, "status": "sick" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("Invalid status"));

        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&admin),
            Some(json!({ "session_id": 0, "user_id": ctx.member.id, "status": "present" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
