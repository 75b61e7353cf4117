use serde::{Deserialize, Serialize};

/// Bearer token payload. Only identifies the user; role and delegation are
/// always read fresh from storage.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
