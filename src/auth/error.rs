// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! `TokenError` is the verification-layer taxonomy; the gate never surfaces
//! it to callers (every failure normalizes to an anonymous request).
//! `AuthError` is the HTTP-boundary rejection used by the extractors when a
//! handler requires an authenticated caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a presented token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The string is not a parseable token
    Malformed,
    /// Signature does not verify against the configured secret
    BadSignature,
    /// Current time is at or past the embedded expiry
    Expired,
}

impl TokenError {
    /// Stable reason code for diagnostics. Never includes token contents.
    pub fn reason_code(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed_token",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "token_expired",
        }
    }
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Token is malformed"),
            TokenError::BadSignature => write!(f, "Token signature is invalid"),
            TokenError::Expired => write!(f, "Token has expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Rejection returned by the `Auth`-family extractors.
///
/// The authentication middleware itself never rejects a request; these
/// errors exist for handlers that declare they need a principal.
#[derive(Debug)]
pub enum AuthError {
    /// No principal was installed for this request
    Unauthenticated,
    /// Principal is present but lacks the required authority
    InsufficientAuthority,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::InsufficientAuthority => "insufficient_authority",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientAuthority => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Authentication is required"),
            AuthError::InsufficientAuthority => {
                write!(f, "Insufficient authority for this operation")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
