// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication.
//!
//! [`RequestAuthenticator`] runs the whole pass for one request: extract
//! a token, verify it, resolve the subject against the identity
//! directory, and build a [`Principal`]. Every failure along the way -
//! no token, malformed token, bad signature, expired token, unknown
//! subject, failing directory - normalizes to `None`. The caller decides
//! what anonymous means; this layer never rejects a request.
//!
//! [`authenticate_request`] is the axum middleware wrapper: it installs
//! the principal into the request's extension slot on success, leaves the
//! request untouched otherwise, and always forwards to the next stage.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::identity::IdentityLookup;
use crate::state::AppState;

use super::claims::Principal;
use super::token::TokenValidator;
use super::transport::TokenTransport;

/// Stateless authentication gate, shared across all requests.
///
/// Holds only read-only collaborators; safe for unsynchronized
/// concurrent use from the server's worker tasks.
pub struct RequestAuthenticator {
    validator: TokenValidator,
    transport: TokenTransport,
    directory: Arc<dyn IdentityLookup>,
}

impl RequestAuthenticator {
    /// Wire the gate from its collaborators.
    pub fn new(
        validator: TokenValidator,
        transport: TokenTransport,
        directory: Arc<dyn IdentityLookup>,
    ) -> Self {
        Self {
            validator,
            transport,
            directory,
        }
    }

    /// Run one authentication pass over the request headers.
    ///
    /// Returns the resolved principal, or `None` if the request could
    /// not be authenticated for any reason. Never returns an error.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let token = self.transport.extract(headers)?;

        let claims = match self.validator.verify(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(reason = e.reason_code(), "token rejected");
                return None;
            }
        };

        let record = match self.directory.by_identity(&claims.sub) {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::debug!(
                    reason = "unknown_subject",
                    subject = %claims.sub,
                    "token subject not in directory"
                );
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    reason = "lookup_failed",
                    subject = %claims.sub,
                    error = %e,
                    "identity lookup failed"
                );
                return None;
            }
        };

        Some(Principal::from_record(record))
    }
}

/// Fail-open authentication middleware.
///
/// Installs a [`Principal`] into the request extensions when the pass
/// succeeds; the request proceeds to the next stage either way. Route
/// handlers (via the `Auth` extractors) own the authorization decision.
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(principal) = state.authenticator.authenticate(request.headers()) {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}
