// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::access::{GreetingResponse, WhoAmIResponse},
    api::health::{HealthChecks, HealthResponse, ReadyResponse},
    auth::{authenticate_request, Principal},
    state::AppState,
};

pub mod access;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/public", get(access::public))
        .route("/me", get(access::me))
        .route("/admin", get(access::admin))
        .with_state(state.clone());

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Fail-open: the gate only installs the principal; route handlers
        // decide whether an anonymous caller is acceptable.
        .layer(middleware::from_fn_with_state(state, authenticate_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        access::public,
        access::me,
        access::admin,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            GreetingResponse,
            WhoAmIResponse,
            ReadyResponse,
            HealthChecks,
            HealthResponse,
            Principal
        )
    ),
    tags(
        (name = "Access", description = "Authenticated access demonstration"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{RequestAuthenticator, TokenTransport, TokenValidator};
    use crate::identity::InMemoryDirectory;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use std::sync::Arc;
    use tower::util::ServiceExt;

    const SECRET: &[u8] = b"router-test-secret-router-test-secret";

    fn test_state() -> (AppState, TokenValidator) {
        let validator = TokenValidator::new(SECRET, Algorithm::HS256);

        let directory = InMemoryDirectory::new();
        directory.seed("alice", vec!["ROLE_USER".to_string()]);
        directory.seed(
            "root",
            vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()],
        );

        let authenticator = RequestAuthenticator::new(
            validator.clone(),
            TokenTransport::default(),
            Arc::new(directory),
        );
        (AppState::new(authenticator), validator)
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("auth_token={token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _) = test_state();
        let app = router(state);
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn liveness_is_public() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(get_request("/health/live", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn public_endpoint_serves_anonymous_callers() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(get_request("/v1/public", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["authenticated"], false);
    }

    #[tokio::test]
    async fn public_endpoint_greets_authenticated_caller() {
        let (state, validator) = test_state();
        let token = validator
            .issue("alice", &[], Duration::seconds(3600))
            .unwrap();

        let response = router(state)
            .oneshot(get_request("/v1/public", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["message"], "Hello, alice");
    }

    #[tokio::test]
    async fn me_rejects_anonymous_with_401() {
        let (state, _) = test_state();
        let response = router(state)
            .oneshot(get_request("/v1/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error_code"], "unauthenticated");
    }

    #[tokio::test]
    async fn me_returns_principal_for_valid_cookie() {
        let (state, validator) = test_state();
        let token = validator
            .issue("alice", &["ROLE_USER".to_string()], Duration::seconds(3600))
            .unwrap();

        let response = router(state)
            .oneshot(get_request("/v1/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["identity"], "alice");
        assert_eq!(body["authorities"], serde_json::json!(["ROLE_USER"]));
    }

    #[tokio::test]
    async fn tampered_token_falls_through_to_anonymous() {
        let (state, validator) = test_state();
        let token = validator
            .issue("alice", &[], Duration::seconds(3600))
            .unwrap();
        let tampered = format!("{}x", token);

        // Still 401 from the handler, not a 500 or a rejection from the gate
        let response = router(state)
            .oneshot(get_request("/v1/me", Some(&tampered)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_requires_admin_authority() {
        let (state, validator) = test_state();

        let user_token = validator
            .issue("alice", &[], Duration::seconds(3600))
            .unwrap();
        let response = router(state.clone())
            .oneshot(get_request("/v1/admin", Some(&user_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_token = validator
            .issue("root", &[], Duration::seconds(3600))
            .unwrap();
        let response = router(state)
            .oneshot(get_request("/v1/admin", Some(&admin_token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_subject_is_anonymous() {
        let (state, validator) = test_state();
        let token = validator
            .issue("ghost", &["ROLE_USER".to_string()], Duration::seconds(3600))
            .unwrap();

        let response = router(state)
            .oneshot(get_request("/v1/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
