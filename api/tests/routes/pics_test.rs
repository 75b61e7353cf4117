#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::helpers::{make_test_app, send, token_for};
    use crate::routes::fixtures::setup;

    fn marker_ids(members: &Value) -> Vec<i64> {
        members
            .as_array()
            .unwrap()
            .iter()
            .filter(|m| m["can_mark_attendance"] == true)
            .map(|m| m["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn create_and_list_pics() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);

        let (status, json) = send(&app, "POST", "/api/pics", Some(&admin), Some(json!({ "name": "Beta" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Beta");

        let (status, json) = send(&app, "POST", "/api/pics", Some(&admin), Some(json!({ "name": "Alpha" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "duplicate_name");

        let (status, json) = send(&app, "GET", "/api/pics", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn reassigning_marker_flips_exactly_one() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);
        let members_uri = format!("/api/pics/{}/members", ctx.alpha.id);

        let (_, json) = send(&app, "GET", &members_uri, Some(&admin), None).await;
        assert_eq!(marker_ids(&json["data"]), vec![ctx.marker.id]);

        let (status, json) = send(
            &app,
            "PUT",
            &members_uri,
            Some(&admin),
            Some(json!({ "member_ids": [ctx.marker.id, ctx.member.id], "marker_id": ctx.member.id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["marker_id"], ctx.member.id);

        let (_, json) = send(&app, "GET", &members_uri, Some(&admin), None).await;
        assert_eq!(marker_ids(&json["data"]), vec![ctx.member.id]);
    }

    #[tokio::test]
    async fn assignment_validates_members() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let admin = token_for(ctx.admin.id);
        let members_uri = format!("/api/pics/{}/members", ctx.alpha.id);

        let (status, json) = send(&app, "PUT", &members_uri, Some(&admin), Some(json!({ "member_ids": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Request must include a non-empty list of member_ids");

        let (status, _) = send(
            &app,
            "PUT",
            &members_uri,
            Some(&admin),
            Some(json!({ "member_ids": [ctx.member.id, 12345] })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "PUT",
            &members_uri,
            Some(&token_for(ctx.marker.id)),
            Some(json!({ "member_ids": [ctx.marker.id], "marker_id": ctx.marker.id })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_is_admin_only_and_releases_members() {
        let (app, state) = make_test_app().await;
        let ctx = setup(state.db()).await;
        let uri = format!("/api/pics/{}", ctx.alpha.id);

        let (status, json) = send(&app, "DELETE", &uri, Some(&token_for(ctx.ketua.id)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "forbidden");

        let admin = token_for(ctx.admin.id);
        let (status, json) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["released_members"], 2);

        let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The former marker can no longer mark.
        let (status, _) = send(
            &app,
            "POST",
            "/api/attendance",
            Some(&token_for(ctx.marker.id)),
            Some(json!({ "session_id": ctx.session.id, "user_id": ctx.member.id, "status": "present" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
