//! Error types for servicebook

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Identity could not be established; list/form operations are blocked
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not authenticated")]
    NotSignedIn,

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),
}

/// Live query failed; the last known record list stays usable
#[derive(Debug, Clone, Error)]
pub enum SubscriptionError {
    #[error("Failed to load records: {0}")]
    Failed(String),

    #[error("Subscription closed")]
    Closed,
}

/// Create/update/delete against the record store failed.
///
/// Local state (edit session, pending delete) is kept on failure so the
/// action can be retried or cancelled explicitly.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Failed to save record: {0}")]
    WriteFailed(String),

    #[error("Store IO error: {0}")]
    Io(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Subscription error: {0}")]
    Subscription(#[from] SubscriptionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("CSV export error: {0}")]
    Csv(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("No active edit session")]
    NoEditSession,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
