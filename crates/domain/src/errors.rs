//! Error types used throughout the workspace

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How loudly an error should be reported.
///
/// Drives log levels: `Info` is expected user behaviour (closing a popup),
/// `Warning` is a recoverable condition the orchestrator handles itself,
/// `Error` must be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

/// Errors reported by the wrapped auth client.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthClientError {
    /// The user closed the popup window.
    #[error("User cancelled the interaction")]
    UserCancelled,

    /// A silent operation needs user interaction (consent, login, ...).
    #[error("Interaction required ({code}): {message}")]
    InteractionRequired { code: String, message: String },

    /// No cached account is available for a silent operation.
    #[error("No account available for silent request")]
    NoAccount,

    /// Network, server, or other client failure.
    #[error("Auth client error ({code}): {message}")]
    Client { code: String, message: String },
}

impl AuthClientError {
    /// Build an interaction-required error.
    pub fn interaction_required(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InteractionRequired { code: code.into(), message: message.into() }
    }

    /// Build a generic client error.
    pub fn client(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Client { code: code.into(), message: message.into() }
    }

    /// Whether a silent failure should fall back to an interactive login.
    ///
    /// A missing account is treated the same as an explicit
    /// interaction-required signal.
    #[must_use]
    pub const fn is_interaction_required(&self) -> bool {
        matches!(self, Self::InteractionRequired { .. } | Self::NoAccount)
    }

    #[must_use]
    pub const fn is_user_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }

    /// Client error code in the browser client's vocabulary.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UserCancelled => "user_cancelled",
            Self::NoAccount => "no_account_error",
            Self::InteractionRequired { code, .. } | Self::Client { code, .. } => code,
        }
    }

    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UserCancelled => ErrorSeverity::Info,
            Self::InteractionRequired { .. } | Self::NoAccount => ErrorSeverity::Warning,
            Self::Client { .. } => ErrorSeverity::Error,
        }
    }
}

/// Errors reported by the host router port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Navigation to {path} was rejected: {reason}")]
    Rejected { path: String, reason: String },

    #[error("Invalid navigation target: {0}")]
    InvalidTarget(String),
}

/// Main error type for authgate
#[derive(Error, Debug)]
pub enum AuthGateError {
    /// A context accessor was used where no plugin has been installed.
    #[error("{0} requires an installed auth plugin")]
    NotInstalled(&'static str),

    #[error(transparent)]
    Client(#[from] AuthClientError),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Navigation guard error: {0}")]
    Guard(String),
}

/// Result type alias for authgate operations
pub type Result<T> = std::result::Result<T, AuthGateError>;
