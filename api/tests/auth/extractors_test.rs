#[cfg(test)]
mod tests {
    use api::auth::claims::{AuthUser, Claims};
    use api::auth::generate_jwt;
    use axum::{
        extract::FromRequestParts,
        http::{Request, StatusCode},
    };
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};
    use util::config::AppConfig;

    use crate::helpers::app::TEST_JWT_SECRET;

    fn generate_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    async fn extract(header: Option<String>) -> Result<AuthUser, (StatusCode, &'static str)> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_token() {
        AppConfig::set_jwt_secret(TEST_JWT_SECRET);
        let claims = Claims {
            sub: 7,
            exp: (now_secs() + 3600) as usize,
        };
        let token = generate_token(&claims, TEST_JWT_SECRET);

        let user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.0.sub, 7);
    }

    #[tokio::test]
    async fn test_generated_token_round_trips() {
        AppConfig::set_jwt_secret(TEST_JWT_SECRET);
        let (token, expiry) = generate_jwt(42);

        let user = extract(Some(format!("Bearer {token}"))).await.unwrap();
        assert_eq!(user.0.sub, 42);
        assert!(chrono::DateTime::parse_from_rfc3339(&expiry).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_token_wrong_secret() {
        AppConfig::set_jwt_secret(TEST_JWT_SECRET);
        let claims = Claims {
            sub: 1,
            exp: (now_secs() + 3600) as usize,
        };
        let token = generate_token(&claims, "wrong_secret");

        let (status, message) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_expired_token() {
        AppConfig::set_jwt_secret(TEST_JWT_SECRET);
        let claims = Claims {
            sub: 1,
            exp: (now_secs() - 3600) as usize,
        };
        let token = generate_token(&claims, TEST_JWT_SECRET);

        let (status, _) = extract(Some(format!("Bearer {token}"))).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (status, message) = extract(None).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Missing or invalid Authorization header");

        let (status, _) = extract(Some("Basic abc".into())).await.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
