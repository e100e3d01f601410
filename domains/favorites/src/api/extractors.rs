//! Caller identity extractor

use axum::{extract::FromRequestParts, http::request::Parts};
use printloom_common::Error;

/// Header carrying the caller's user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity taken from the `x-user-id` header
#[derive(Debug, Clone, PartialEq)]
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| Error::Validation(format!("Missing {} header", USER_ID_HEADER)))?;

        let user_id = value
            .to_str()
            .map_err(|_| Error::Validation(format!("Invalid {} header", USER_ID_HEADER)))?
            .trim();

        if user_id.is_empty() {
            return Err(Error::Validation(format!("Empty {} header", USER_ID_HEADER)));
        }

        Ok(UserId(user_id.to_string()))
    }
}
