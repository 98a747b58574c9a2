use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::ServiceError;

/// Header carrying the authenticated caller's user id. Session and token
/// management live in front of this service; by the time a request reaches
/// us the gateway has resolved the identity and stamped this header.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, threaded explicitly into every booking and
/// cancellation call instead of a process-global "current user".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            ServiceError::Unauthorized(format!("Missing {} header", USER_ID_HEADER))
        })?;

        let user_id = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| {
                ServiceError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER))
            })?;

        Ok(AuthUser { user_id })
    }
}
