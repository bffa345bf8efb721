// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! immutable thereafter. The signing secret in particular is read
//! exactly once; every request-handling task shares the same read-only
//! key material.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for the identity directory | `/data` |
//! | `TOKEN_SECRET` | HMAC signing secret | Required |
//! | `TOKEN_ALGORITHM` | `HS256`, `HS384`, or `HS512` | `HS256` |
//! | `TOKEN_TTL_SECS` | Lifetime of issued tokens | `3600` |
//! | `TOKEN_TRANSPORT` | `cookie` or `bearer` | `cookie` |
//! | `TOKEN_COOKIE` | Cookie name for cookie transport | `auth_token` |
//! | `SEED_IDENTITY` | Seed `user:ROLE_A\|ROLE_B` at startup | unset |
//! | `ISSUE_DEV_TOKEN` | Log a token for this subject at startup | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use jsonwebtoken::Algorithm;

use crate::auth::{TokenTransport, DEFAULT_COOKIE_NAME};

/// Environment variable name for the identity directory root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default identity directory root.
pub const DATA_DIR_DEFAULT: &str = "/data";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub token_secret: String,
    pub token_algorithm: Algorithm,
    pub token_ttl: Duration,
    pub transport: TokenTransport,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid("HOST/PORT"))?;

        let data_dir =
            PathBuf::from(env::var(DATA_DIR_ENV).unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string()));

        let token_secret =
            env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;
        if token_secret.len() < 16 {
            return Err(ConfigError::Invalid("TOKEN_SECRET"));
        }

        let token_algorithm = match env::var("TOKEN_ALGORITHM") {
            Ok(name) => parse_hmac_algorithm(&name).ok_or(ConfigError::Invalid("TOKEN_ALGORITHM"))?,
            Err(_) => Algorithm::HS256,
        };

        let ttl_secs: i64 = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid("TOKEN_TTL_SECS"));
        }

        let cookie_name =
            env::var("TOKEN_COOKIE").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string());
        let transport = match env::var("TOKEN_TRANSPORT") {
            Ok(name) => parse_transport(&name, cookie_name)
                .ok_or(ConfigError::Invalid("TOKEN_TRANSPORT"))?,
            Err(_) => TokenTransport::Cookie { name: cookie_name },
        };

        Ok(Config {
            addr,
            data_dir,
            token_secret,
            token_algorithm,
            token_ttl: Duration::seconds(ttl_secs),
            transport,
        })
    }
}

/// Parse an HMAC algorithm identifier. Asymmetric algorithms are not
/// accepted; the gate is configured with a single shared secret.
fn parse_hmac_algorithm(name: &str) -> Option<Algorithm> {
    match name.to_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

fn parse_transport(name: &str, cookie_name: String) -> Option<TokenTransport> {
    match name.to_lowercase().as_str() {
        "cookie" => Some(TokenTransport::Cookie { name: cookie_name }),
        "bearer" => Some(TokenTransport::Bearer),
        _ => None,
    }
}
