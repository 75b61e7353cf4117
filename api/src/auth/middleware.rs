use std::time::Instant;

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;

use crate::auth::claims::AuthUser;

/// Logs method, path, user id (`0` when anonymous), status and latency for
/// every request except CORS preflights.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let user_id = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map(|AuthUser(c)| c.sub)
        .unwrap_or(0);
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();

    let started = Instant::now();
    let response = next.run(Request::from_parts(parts, body)).await;

    info!(
        %method,
        %path,
        user = user_id,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
