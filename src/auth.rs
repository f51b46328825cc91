// ABOUTME: Trusted-identity extraction and tenant enforcement for route handlers
// ABOUTME: Reads the identity header injected by the upstream auth gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Authentication Context
//!
//! JWT verification happens upstream: the gateway validates the token and
//! forwards the authenticated identity in the `x-user-id` header. This
//! module extracts that identity and enforces that it matches the tenant
//! named in the request path, before any storage access.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::{AppError, AppResult};

/// Header carrying the authenticated identity, set by the auth gateway
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Authenticated identity for the current request
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The tenant id every data operation of this request is scoped to
    pub tenant_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(AppError::auth_required)?;

        Ok(Self {
            tenant_id: identity.to_owned(),
        })
    }
}

/// Require that the authenticated identity matches the path tenant
///
/// # Errors
///
/// Returns `PermissionDenied` on mismatch. Called before any storage access.
pub fn ensure_tenant(auth: &AuthContext, path_tenant: &str) -> AppResult<()> {
    if auth.tenant_id == path_tenant {
        Ok(())
    } else {
        Err(AppError::permission_denied(
            "Authenticated identity does not match the requested tenant",
        ))
    }
}
