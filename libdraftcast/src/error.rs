//! Error types for Draftcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DraftcastError>;

#[derive(Error, Debug)]
pub enum DraftcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transformation failed: {0}")]
    Transformation(String),
}

impl DraftcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DraftcastError::Validation(_) => 3,
            DraftcastError::NotFound(_) => 2,
            DraftcastError::Transformation(_) => 1,
            DraftcastError::Config(_) => 1,
            DraftcastError::Database(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored data: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors produced by a rewrite provider.
///
/// Kept separate from [`DraftcastError`] so callers can decide per operation
/// whether a provider fault is masked (generate) or surfaced (suggest).
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,
}
