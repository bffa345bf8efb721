// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Extractors for the request-scoped principal.
//!
//! The authentication middleware installs at most one [`Principal`] per
//! request; these extractors are how handlers read that slot. There is
//! no thread-bound global - the principal travels with the request.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.identity, principal.authorities
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::identity::RoleName;

use super::claims::Principal;
use super::error::AuthError;

/// Extractor requiring an authenticated caller.
///
/// Rejects with 401 when the middleware left the request anonymous.
pub struct Auth(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Optional authentication extractor.
///
/// Returns `None` for anonymous requests instead of rejecting. Use for
/// endpoints that serve both authenticated and anonymous callers.
pub struct OptionalAuth(pub Option<Principal>);

impl<S: Send + Sync> FromRequestParts<S> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<Principal>().cloned()))
    }
}

/// Extractor requiring the admin authority.
///
/// 401 when anonymous, 403 when authenticated without `ROLE_ADMIN`.
pub struct AdminOnly(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;

        if !principal.has_authority(RoleName::Admin.label()) {
            return Err(AuthError::InsufficientAuthority);
        }

        Ok(AdminOnly(principal))
    }
}
