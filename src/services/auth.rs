// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lookup, sign-out and auth-state notifications.
//!
//! Access tokens are HS256 JWTs issued by the authentication service and
//! verified with the shared signing key. Signing out revokes the token
//! locally until it would have expired anyway.

use crate::error::{AppError, Result};
use crate::models::Session;
use crate::services::listeners::{Listener, ListenerRegistry, Subscription};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A change in authentication state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut { user_id: String },
}

impl AuthEvent {
    pub fn user_id(&self) -> &str {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::TokenRefreshed(session) => {
                &session.user_id
            }
            AuthEvent::SignedOut { user_id } => user_id,
        }
    }
}

/// Authentication service facade.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    /// Revoked token -> original expiry
    revoked: Arc<DashMap<String, DateTime<Utc>>>,
    /// Current token per signed-in user
    active: Arc<DashMap<String, String>>,
    listeners: ListenerRegistry<AuthEvent>,
}

impl AuthService {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(signing_key),
            revoked: Arc::new(DashMap::new()),
            active: Arc::new(DashMap::new()),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Look up the session for an access token.
    ///
    /// Returns `None` for missing, invalid, expired or revoked tokens; an
    /// absent session is a routing decision, not an error.
    pub fn current_session(&self, token: Option<&str>) -> Option<Session> {
        let token = token?;
        if self.revoked.contains_key(token) {
            tracing::debug!("Rejected revoked session token");
            return None;
        }

        match self.decode_session(token) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "Session token rejected");
                None
            }
        }
    }

    /// Establish a session from a freshly issued access token.
    ///
    /// Emits `SignedIn`, or `TokenRefreshed` when the user already had a
    /// session with a different token.
    pub fn sign_in(&self, token: &str) -> Result<Session> {
        let session = self
            .current_session(Some(token))
            .ok_or(AppError::InvalidToken)?;

        let previous = self
            .active
            .insert(session.user_id.clone(), token.to_string());

        let event = match previous {
            Some(previous) if previous != token => AuthEvent::TokenRefreshed(session.clone()),
            Some(_) => return Ok(session),
            None => AuthEvent::SignedIn(session.clone()),
        };

        tracing::info!(
            user_id = %session.user_id,
            event = event_name(&event),
            "Auth state changed"
        );
        self.listeners.emit(&event);
        Ok(session)
    }

    /// Terminate a session: revoke its token and notify listeners.
    pub fn sign_out(&self, session: &Session) {
        let now = Utc::now();
        self.revoked.retain(|_, expires_at| *expires_at > now);
        self.revoked
            .insert(session.access_token.clone(), session.expires_at);

        self.active
            .remove_if(&session.user_id, |_, token| *token == session.access_token);

        tracing::info!(user_id = %session.user_id, "Signed out");
        self.listeners.emit(&AuthEvent::SignedOut {
            user_id: session.user_id.clone(),
        });
    }

    /// Register for auth-state changes. Drop the subscription to stop.
    pub fn subscribe(&self, listener: Arc<dyn Listener<AuthEvent>>) -> Subscription {
        self.listeners.subscribe(listener)
    }

    /// Number of registered auth-state listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn decode_session(&self, token: &str) -> anyhow::Result<Session> {
        let mut validation = Validation::new(Algorithm::HS256);
        // The auth service sets an audience we do not pin.
        validation.validate_aud = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;
        if claims.sub.is_empty() {
            anyhow::bail!("token has an empty subject");
        }

        let expires_at = DateTime::from_timestamp(claims.exp as i64, 0)
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;

        Ok(Session {
            user_id: claims.sub,
            email: claims.email,
            access_token: token.to_string(),
            expires_at,
        })
    }
}

fn event_name(event: &AuthEvent) -> &'static str {
    match event {
        AuthEvent::SignedIn(_) => "signed_in",
        AuthEvent::TokenRefreshed(_) => "token_refreshed",
        AuthEvent::SignedOut { .. } => "signed_out",
    }
}

/// Create an access token the way the authentication service does.
///
/// Used for local development and tests.
pub fn create_jwt(
    user_id: &str,
    email: Option<&str>,
    signing_key: &[u8],
    ttl: chrono::Duration,
) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now as usize,
        exp: (now + ttl.num_seconds()) as usize,
        email: email.map(String::from),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
