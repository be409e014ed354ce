//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does
//! not match. Use these in route handlers to enforce authorization at the
//! type level. Roles come from the identity provider's token and are
//! trusted as-is.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use leadex_core::error::CoreError;
use leadex_core::roles::{ROLE_ADMIN, ROLE_COMPANY, ROLE_SCOUT};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires the `scout` role. Rejects with 403 Forbidden otherwise.
pub struct RequireScout(pub AuthUser);

impl FromRequestParts<AppState> for RequireScout {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_SCOUT {
            return Err(AppError::Core(CoreError::Forbidden(
                "Scout role required".into(),
            )));
        }
        Ok(RequireScout(user))
    }
}

/// Requires the `company` role. Rejects with 403 Forbidden otherwise.
pub struct RequireCompany(pub AuthUser);

impl FromRequestParts<AppState> for RequireCompany {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_COMPANY {
            return Err(AppError::Core(CoreError::Forbidden(
                "Company role required".into(),
            )));
        }
        Ok(RequireCompany(user))
    }
}
