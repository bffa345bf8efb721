// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token extraction strategies.
//!
//! The gate reads the token from exactly one well-known request field,
//! selected at startup: an HTTP-only cookie (the default) or the bearer
//! authorization header. The transport is a configuration choice, not a
//! fallback chain; the two are never combined. A missing field is not
//! an error, it is "no token presented."

use axum::http::{header, HeaderMap};

/// Default cookie name for cookie transport.
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";

/// Where the gate looks for a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTransport {
    /// A named cookie in the `Cookie` header
    Cookie { name: String },
    /// `Authorization: Bearer <token>`
    Bearer,
}

impl Default for TokenTransport {
    fn default() -> Self {
        TokenTransport::Cookie {
            name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl TokenTransport {
    /// Extract a token from the request headers, if one is presented.
    pub fn extract(&self, headers: &HeaderMap) -> Option<String> {
        match self {
            TokenTransport::Cookie { name } => headers
                .get_all(header::COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .flat_map(|value| value.split(';'))
                .filter_map(|pair| pair.trim().split_once('='))
                .find(|(key, _)| *key == name)
                .map(|(_, token)| token.to_string()),
            TokenTransport::Bearer => headers
                .get(header::AUTHORIZATION)?
                .to_str()
                .ok()?
                .strip_prefix("Bearer ")
                .map(|token| token.trim().to_string()),
        }
    }
}
