//! Login and session state.

use crate::dto::rpc::LoginResponse;
use crate::error::{excerpt, BetfairError, Result};
use crate::transport::Transport;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use tracing::{info, warn};

/// Username, password and application key for one account.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    app_key: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        app_key: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            app_key: app_key.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("appKey", &self.app_key),
        ] {
            if value.trim().is_empty() {
                return Err(BetfairError::validation(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("app_key", &self.app_key)
            .finish()
    }
}

/// A successful login. Lives only in memory.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    app_key: String,
    created_at: DateTime<Utc>,
    login_response: Value,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The login response body exactly as decoded.
    pub fn login_response(&self) -> &Value {
        &self.login_response
    }

    pub fn summary(&self) -> SessionSummary {
        let field = |name: &str| {
            self.login_response
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        SessionSummary {
            token: self.token.clone(),
            created_at: self.created_at,
            status: field("status").unwrap_or_default(),
            product: field("product"),
        }
    }
}

/// Read-only view of the held session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub product: Option<String>,
}

/// Exchanges credentials for a session token.
///
/// Every failure after local validation, transport errors included, is
/// reported as [`BetfairError::Auth`].
pub async fn login(transport: &Transport, credentials: &Credentials) -> Result<Session> {
    credentials.validate()?;

    let reply = transport.post_login(credentials).await.map_err(|e| match e {
        BetfairError::Validation { .. } => e,
        other => BetfairError::auth(None, other.to_string()),
    })?;

    if !(200..300).contains(&reply.status) {
        warn!("Login rejected with HTTP {}", reply.status);
        return Err(BetfairError::auth(Some(reply.status), excerpt(&reply.body)));
    }

    let raw: Value = serde_json::from_str(&reply.body).map_err(|_| {
        BetfairError::auth(
            Some(reply.status),
            format!("malformed login response: {}", excerpt(&reply.body)),
        )
    })?;
    let response: LoginResponse = serde_json::from_value(raw.clone()).map_err(|_| {
        BetfairError::auth(
            Some(reply.status),
            format!("malformed login response: {}", excerpt(&reply.body)),
        )
    })?;

    if !response.is_success() {
        let reason = response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or(response.status);
        warn!("Login failed: {}", reason);
        return Err(BetfairError::auth(Some(reply.status), reason));
    }

    let token = response
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BetfairError::auth(Some(reply.status), "login succeeded without a token"))?;

    info!("Logged in as {}", credentials.username());
    Ok(Session {
        token,
        app_key: credentials.app_key().to_string(),
        created_at: Utc::now(),
        login_response: raw,
    })
}
