use axum::extract::FromRequestParts;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity taken from the `X-User-ID` header. Authentication is out of
/// scope for this service; the header is trusted as-is but must parse as a
/// numeric user id.
#[derive(Debug, Clone, Copy)]
pub struct RequestUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest("Missing X-User-ID header".into()))?;

        let raw = header
            .to_str()
            .map_err(|_| AppError::Validation("X-User-ID header is not valid text".into()))?;

        let user_id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Validation("X-User-ID must be a numeric user id".into()))?;

        Ok(RequestUser { user_id })
    }
}
