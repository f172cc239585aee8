use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's id, set by the auth gateway
/// in front of this service
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity for one request
///
/// Extracted per request and handed to every component that needs to know
/// who is asking; nothing keeps a "current user" between requests.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;

        let user_id = header
            .to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Invalid {} header", USER_ID_HEADER))
            })?;

        Ok(Self { user_id })
    }
}
