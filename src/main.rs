// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;
use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use authgate::api::router;
use authgate::auth::{RequestAuthenticator, TokenValidator};
use authgate::config::Config;
use authgate::identity::{FileDirectory, IdentityRecord};
use authgate::state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

/// Parse `user:ROLE_A|ROLE_B` seed syntax.
fn parse_seed(spec: &str) -> Option<(String, Vec<String>)> {
    let (username, roles) = spec.split_once(':')?;
    let authorities: Vec<String> = roles
        .split('|')
        .filter(|r| !r.is_empty())
        .map(|r| r.to_string())
        .collect();
    if username.is_empty() {
        return None;
    }
    Some((username.to_string(), authorities))
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Invalid configuration");

    // Initialize the identity directory
    let mut directory = FileDirectory::new(&config.data_dir);
    directory
        .initialize()
        .expect("Failed to initialize identity directory");

    if let Ok(spec) = env::var("SEED_IDENTITY") {
        match parse_seed(&spec) {
            Some((username, authorities)) => {
                let record = IdentityRecord {
                    username: username.clone(),
                    credential_hash: String::new(),
                    authorities,
                    created_at: Utc::now(),
                };
                directory
                    .put(&record)
                    .expect("Failed to seed identity directory");
                tracing::info!(%username, "seeded identity");
            }
            None => tracing::warn!("ignoring malformed SEED_IDENTITY (want user:ROLE_A|ROLE_B)"),
        }
    }

    let validator = TokenValidator::new(config.token_secret.as_bytes(), config.token_algorithm);

    // Development convenience: log a usable token for the named subject
    if let Ok(subject) = env::var("ISSUE_DEV_TOKEN") {
        let authorities = directory
            .get(&subject)
            .ok()
            .flatten()
            .map(|record| record.authorities)
            .unwrap_or_default();
        match validator.issue(&subject, &authorities, config.token_ttl) {
            Ok(token) => tracing::info!(%subject, token = %token, "issued development token"),
            Err(e) => tracing::warn!(error = %e, "failed to issue development token"),
        }
    }

    let authenticator =
        RequestAuthenticator::new(validator, config.transport.clone(), Arc::new(directory));
    let state = AppState::new(authenticator);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!(addr = %config.addr, "authgate listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown signal received");
    }
}
