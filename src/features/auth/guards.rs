//! Permission-based authorization guards.
//!
//! Guards extract the authenticated user placed in request extensions by the
//! auth middleware and verify it carries the permissions a route needs.
//! A request without a user is rejected with 401, a user lacking a
//! permission with 403 listing what is missing.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::PERMISSION_ADD_LOCATION;
use axum::{extract::FromRequestParts, http::request::Parts};

fn require_permissions(
    parts: &Parts,
    required: &[&str],
) -> Result<AuthenticatedUser, AppError> {
    let user = parts
        .extensions
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("User is not authenticated".to_string()))?;

    let missing = user.missing_permissions(required);
    if !missing.is_empty() {
        return Err(AppError::Forbidden(format!(
            "User is missing the following permissions: {:?}",
            missing
        )));
    }

    Ok(user.clone())
}

/// Guard for routes that submit new rubbish locations.
///
/// # Example
/// ```ignore
/// pub async fn handler(CanAddLocation(user): CanAddLocation) { ... }
/// ```
pub struct CanAddLocation(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CanAddLocation
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_permissions(parts, &[PERMISSION_ADD_LOCATION]).map(CanAddLocation)
    }
}
