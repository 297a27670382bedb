//! Session identity. Authentication itself happens in the session provider in
//! front of this service; it forwards the signed-in user's email in a header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

/// Header set by the session provider for authenticated requests.
pub const SESSION_EMAIL_HEADER: &str = "x-forwarded-email";

/// The signed-in user, extracted from the session header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(SESSION_EMAIL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(SessionUser {
            email: email.to_lowercase(),
        })
    }
}
