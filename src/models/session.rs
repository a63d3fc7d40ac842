// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session context.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An authenticated user session, derived from an access token issued by
/// the authentication service.
///
/// Passed explicitly to every component that acts on behalf of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Account id (token subject); owner of every row the user writes
    pub user_id: String,
    pub email: Option<String>,
    /// Bearer token forwarded to the store so row-level security applies
    #[serde(skip)]
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Name shown in the dashboard greeting: the local part of the email.
    pub fn display_name(&self) -> &str {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("")
    }
}
