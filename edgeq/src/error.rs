//! Error types for edgeq operations.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid Where Clause")]
    InvalidWhereClause,

    #[error("Invalid Field: {0}")]
    InvalidField(String),

    #[error("Invalid Related Field: {0}")]
    InvalidRelatedField(String),

    #[error("Invalid Filter Operator: {0}")]
    InvalidFilterOperator(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unsupported API version: {0}")]
    UnsupportedVersion(String),

    #[error("Method Not Allowed: {0}")]
    MethodNotAllowed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Schema file not found at {0}")]
    SchemaNotFound(PathBuf),

    #[error("edgeq already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status code a transport layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidWhereClause
            | Error::InvalidField(_)
            | Error::InvalidRelatedField(_)
            | Error::InvalidFilterOperator(_)
            | Error::UnsupportedVersion(_) => 400,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }

    /// True for errors caused by the request itself rather than the deployment.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
