// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access endpoints demonstrating the three authentication levels.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{AdminOnly, Auth, OptionalAuth, Principal};

/// Response for GET /v1/public
#[derive(Debug, Serialize, ToSchema)]
pub struct GreetingResponse {
    /// Greeting, personalized when the caller is authenticated
    pub message: String,
    /// Whether the caller was authenticated
    pub authenticated: bool,
}

/// Response for GET /v1/me
#[derive(Debug, Serialize, ToSchema)]
pub struct WhoAmIResponse {
    /// Identity string (the token subject)
    pub identity: String,
    /// Granted authority labels
    pub authorities: Vec<String>,
}

impl From<Principal> for WhoAmIResponse {
    fn from(principal: Principal) -> Self {
        Self {
            identity: principal.identity,
            authorities: principal.authorities,
        }
    }
}

/// Public endpoint, reachable with or without a token.
#[utoipa::path(
    get,
    path = "/v1/public",
    tag = "Access",
    responses(
        (status = 200, description = "Greeting", body = GreetingResponse),
    )
)]
pub async fn public(OptionalAuth(principal): OptionalAuth) -> Json<GreetingResponse> {
    let response = match principal {
        Some(principal) => GreetingResponse {
            message: format!("Hello, {}", principal.identity),
            authenticated: true,
        },
        None => GreetingResponse {
            message: "Hello, anonymous".to_string(),
            authenticated: false,
        },
    };
    Json(response)
}

/// Get the current authenticated principal.
#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "Access",
    responses(
        (status = 200, description = "Caller identity", body = WhoAmIResponse),
        (status = 401, description = "Unauthenticated"),
    )
)]
pub async fn me(Auth(principal): Auth) -> Json<WhoAmIResponse> {
    Json(principal.into())
}

/// Admin-only endpoint.
#[utoipa::path(
    get,
    path = "/v1/admin",
    tag = "Access",
    responses(
        (status = 200, description = "Caller identity", body = WhoAmIResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Authenticated without ROLE_ADMIN"),
    )
)]
pub async fn admin(AdminOnly(principal): AdminOnly) -> Json<WhoAmIResponse> {
    Json(principal.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whoami_response_from_principal() {
        let principal = Principal {
            identity: "alice".to_string(),
            authorities: vec!["ROLE_USER".to_string()],
        };

        let response: WhoAmIResponse = principal.into();
        assert_eq!(response.identity, "alice");
        assert_eq!(response.authorities, vec!["ROLE_USER"]);
    }
}
