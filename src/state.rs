// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::RequestAuthenticator;

/// Shared application state, cheap to clone per request.
///
/// Everything inside is read-only after startup; there is no shared
/// mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<RequestAuthenticator>,
}

impl AppState {
    pub fn new(authenticator: RequestAuthenticator) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
        }
    }
}
