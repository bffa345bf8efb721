// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless per-request token authentication.
//!
//! ## Flow
//!
//! 1. A token is issued out of band (signed JWT: subject + expiry)
//! 2. The client presents it in the configured transport (cookie by
//!    default, bearer header optionally)
//! 3. The gate, per request:
//!    - extracts the token
//!    - verifies signature and expiry
//!    - resolves the subject against the identity directory
//!    - installs a [`Principal`] into the request extensions
//!
//! ## Failure Policy
//!
//! Fail-open-to-anonymous: any failure leaves the request
//! unauthenticated and forwards it unchanged. Handlers that require a
//! caller use the [`Auth`]/[`AdminOnly`] extractors, which turn a
//! missing principal into 401/403. This layer itself never rejects.

pub mod authenticator;
pub mod claims;
pub mod error;
pub mod extract;
pub mod token;
pub mod transport;

pub use authenticator::{authenticate_request, RequestAuthenticator};
pub use claims::{Claims, Principal};
pub use error::{AuthError, TokenError};
pub use extract::{AdminOnly, Auth, OptionalAuth};
pub use token::{Clock, SystemClock, TokenValidator};
pub use transport::{TokenTransport, DEFAULT_COOKIE_NAME};
