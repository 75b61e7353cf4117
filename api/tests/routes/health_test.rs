#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::helpers::{make_test_app, send};

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let (app, _) = make_test_app().await;

        let (status, json) = send(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert_eq!(json["message"], "Health check passed");
    }

    #[tokio::test]
    async fn protected_groups_require_a_token() {
        let (app, _) = make_test_app().await;

        for uri in ["/api/sessions", "/api/pics", "/api/users/1/attendance"] {
            let (status, json) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(json["success"], false);
            assert_eq!(json["message"], "Authentication required");
        }
    }
}
