#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::{make_test_app, send, token_for};
    use crate::routes::fixtures::setup;

    #[tokio::test]
    async fn create_and_list_sessions() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let ketua = token_for(ctx.ketua.id);

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&ketua),
            Some(json!({ "name": "Rapat Pleno", "date": "2026-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Rapat Pleno");
        assert_eq!(json["data"]["date"], "2026-02-01");
        assert_eq!(json["data"]["is_locked"], false);

        let (status, json) = send(&app, "GET", "/api/sessions", Some(&ketua), None).await;
        assert_eq!(status, StatusCode::OK);
        let sessions = json["data"].as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["name"], "Rapat Pleno");
    }

    #[tokio::test]
    async fn member_cannot_create_sessions() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&token_for(ctx.marker.id)),
            Some(json!({ "name": "Halaqah", "date": "2026-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "forbidden");
    }

    #[tokio::test]
    async fn empty_session_name_is_400() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/sessions",
            Some(&token_for(ctx.admin.id)),
            Some(json!({ "name": "", "date": "2026-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Session name must be between 1 and 150 characters"
        );
    }

    #[tokio::test]
    async fn lock_twice_then_status_reports_locked() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);
        let lock_uri = format!("/api/sessions/{}/lock", ctx.session.id);

        for _ in 0..2 {
            let (status, json) = send(&app, "POST", &lock_uri, Some(&admin), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["data"]["locked"], true);
        }

        let status_uri = format!("/api/sessions/{}/status", ctx.session.id);
        let (status, json) = send(&app, "GET", &status_uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], ctx.session.id);
        assert_eq!(json["data"]["name"], "Mentoring Alpha");
        assert_eq!(json["data"]["locked"], true);
    }

    #[tokio::test]
    async fn member_cannot_lock() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;

        let uri = format!("/api/sessions/{}/lock", ctx.session.id);
        let (status, _) = send(&app, "POST", &uri, Some(&token_for(ctx.marker.id)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn batch_records_and_skips_duplicates() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let marker = token_for(ctx.marker.id);
        let uri = format!("/api/sessions/{}/attendance/batch", ctx.session.id);

        let body = json!({
            "entries": [
                { "user_id": ctx.member.id, "status": "present" },
                { "user_id": ctx.marker.id, "status": "late" }
            ]
        });
        let (status, json) = send(&app, "POST", &uri, Some(&marker), Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["recorded"], json!([ctx.member.id, ctx.marker.id]));
        assert_eq!(json["data"]["skipped"], json!([]));

        let (status, json) = send(&app, "POST", &uri, Some(&marker), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["recorded"], json!([]));
        assert_eq!(json["data"]["skipped"], json!([ctx.member.id, ctx.marker.id]));
    }

    #[tokio::test]
    async fn batch_with_foreign_member_is_rejected_whole() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let marker = token_for(ctx.marker.id);
        let uri = format!("/api/sessions/{}/attendance/batch", ctx.session.id);

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(&marker),
            Some(json!({
                "attendance_type": "regular",
                "entries": [
                    { "user_id": ctx.member.id, "status": "present" },
                    { "user_id": ctx.outsider.id, "status": "present" }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "forbidden");

        let list_uri = format!("/api/sessions/{}/attendance", ctx.session.id);
        let (_, json) = send(&app, "GET", &list_uri, Some(&marker), None).await;
        assert_eq!(json["data"], json!([]));
    }

    #[tokio::test]
    async fn batch_requires_entries() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let uri = format!("/api/sessions/{}/attendance/batch", ctx.session.id);

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(&token_for(ctx.admin.id)),
            Some(json!({ "entries": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Request must include at least one entry");
    }

    #[tokio::test]
    async fn session_attendance_filters_by_type() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);

        send(
            &app,
            "POST",
            "/api/attendance",
            Some(&admin),
            Some(json!({ "session_id": ctx.session.id, "user_id": ctx.ketua.id, "status": "present" })),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/attendance/core",
            Some(&admin),
            Some(json!({ "session_id": ctx.session.id, "user_id": ctx.ketua.id, "status": "excused" })),
        )
        .await;

        let base = format!("/api/sessions/{}/attendance", ctx.session.id);
        let (_, all) = send(&app, "GET", &base, Some(&admin), None).await;
        assert_eq!(all["data"].as_array().unwrap().len(), 2);

        let (status, core) = send(&app, "GET", &format!("{base}?type=core"), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let core = core["data"].as_array().unwrap();
        assert_eq!(core.len(), 1);
        assert_eq!(core[0]["status"], "excused");

        let (status, _) = send(&app, "GET", &format!("{base}?type=vip"), Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "GET", &base, Some(&token_for(ctx.outsider.id)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
