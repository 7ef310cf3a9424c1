//! Error types for the Betfair client.
//!
//! Every operation returns [`BetfairError`]; [`BetfairError::kind`] groups the
//! variants into the broad failure classes callers usually branch on.

use std::path::PathBuf;

/// Broad classification of a [`BetfairError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected locally before any request was sent.
    Validation,
    /// Login failed, or no session is held.
    Auth,
    /// Transport-level failure.
    Network,
    /// The API answered with an error envelope.
    Api,
    /// A result record lacked a field the flattener needs.
    Parse,
    /// The configuration file could not be read or parsed.
    Config,
}

/// The main error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum BetfairError {
    /// A filter, option or credential failed a local shape check.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Login failed or the client holds no session.
    #[error("authentication failed{}: {detail}", status_label(.status))]
    Auth { status: Option<u16>, detail: String },

    /// Non-2xx response without an API error body, or an undecodable body.
    #[error("request failed{}: {detail}", status_label(.status))]
    Network { status: Option<u16>, detail: String },

    /// HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a well-formed error envelope.
    #[error("{method} returned {code}: {description}")]
    Api {
        method: String,
        code: String,
        description: String,
    },

    /// A result record is missing a field the flattener depends on.
    #[error("could not parse {method} response: {} is missing `{field}`", record_label(.record))]
    Parse {
        method: String,
        record: Option<usize>,
        field: String,
    },

    /// The configuration file could not be read.
    #[error("could not read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML or lacks required keys.
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// A specialized Result type for client operations.
pub type Result<T> = std::result::Result<T, BetfairError>;

fn status_label(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn record_label(record: &Option<usize>) -> String {
    match record {
        Some(index) => format!("record {index}"),
        None => "response".to_string(),
    }
}

impl BetfairError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn auth(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Auth {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_logged_in() -> Self {
        Self::auth(None, "not logged in")
    }

    pub fn network(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Network {
            status,
            detail: detail.into(),
        }
    }

    pub fn parse(method: impl Into<String>, record: Option<usize>, field: impl Into<String>) -> Self {
        Self::Parse {
            method: method.into(),
            record,
            field: field.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Network { .. } | Self::Http(_) => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::ConfigRead { .. } | Self::ConfigParse(_) => ErrorKind::Config,
        }
    }
}

/// Cuts a response body down to something fit for an error message.
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((end, _)) => format!("{}...", &trimmed[..end]),
        None => trimmed.to_string(),
    }
}
