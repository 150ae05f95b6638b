//! Session tokens.
//!
//! Sessions are HS256 JWTs issued by the identity provider (or by the dev
//! endpoint) and verified here before the route guard sees them.

use std::collections::HashSet;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use jwt_simple::prelude::{Claims, Duration, HS256Key, MACLike, VerificationOptions};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SessionToken;
use crate::util::extract_bearer_token;

const ISSUER: &str = "postwise";
const SESSION_HOURS: u64 = 24;

/// Custom claims carried next to the standard ones (`sub`, `iss`, `exp`).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

/// Signing key plus the cookie name sessions travel in.
#[derive(Clone)]
pub struct SessionKeys {
    key: HS256Key,
    cookie_name: String,
}

impl SessionKeys {
    pub fn new(secret: &[u8], cookie_name: impl Into<String>) -> Self {
        Self {
            key: HS256Key::from_bytes(secret),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a session token for `session`.
    pub fn issue(&self, session: &SessionToken) -> Result<String> {
        let custom = SessionClaims {
            email: session.email.clone(),
            is_admin: session.is_admin,
        };
        let claims = Claims::with_custom_claims(custom, Duration::from_hours(SESSION_HOURS))
            .with_issuer(ISSUER)
            .with_subject(&session.subject);

        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    /// Verify signature, issuer and expiry and return the typed session.
    pub fn verify(&self, token: &str) -> Result<SessionToken> {
        let mut issuers = HashSet::new();
        issuers.insert(ISSUER.to_string());
        let options = VerificationOptions {
            allowed_issuers: Some(issuers),
            ..Default::default()
        };

        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(|_| AppError::Unauthorized)?;

        let subject = claims
            .subject
            .filter(|s| !s.is_empty())
            .ok_or(AppError::Unauthorized)?;

        Ok(SessionToken {
            subject,
            email: claims.custom.email,
            is_admin: claims.custom.is_admin,
        })
    }

    /// Find and verify the session for a request.
    ///
    /// The `Authorization: Bearer` header wins over the session cookie. Any
    /// verification failure yields `None`: the request is then anonymous.
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<SessionToken> {
        let jar = CookieJar::from_headers(headers);
        let raw = match extract_bearer_token(headers) {
            Some(token) => token.to_string(),
            None => jar.get(&self.cookie_name)?.value().to_string(),
        };

        match self.verify(&raw) {
            Ok(session) => Some(session),
            Err(_) => {
                tracing::debug!("Ignoring session token that failed verification");
                None
            }
        }
    }
}
