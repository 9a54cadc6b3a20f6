//! Service Packager - per-project packaging configuration over HTTP.
//!
//! This library provides the core functionality for the `service-packager`
//! binary: the JSON-backed settings repository, the uniform response
//! envelope, configuration resolution and the HTTP endpoints.

pub mod cli;
pub mod config;
pub mod envelope;
pub mod models;
pub mod server;
pub mod settings;


/// Library-level error type for Service Packager operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A programming error, such as a failure code equal to the success code.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Property \"{key}\" cannot be converted to {target}")]
    Coercion { key: String, target: &'static str },

    #[error("Property \"{0}\" is not a list")]
    NotAList(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Service Packager operations.
pub type Result<T> = std::result::Result<T, Error>;
