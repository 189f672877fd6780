//! Core error types for stenocombo-core.
//!
//! Malformed color lines and missing settings are recovered locally and never
//! surface here. These types cover settings persistence, explicit value
//! validation and simulation scripts.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stenocombo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unparseable simulation script
    #[error("Invalid script token {index} ('{token}'): {message}")]
    Script {
        index: usize,
        token: String,
        message: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value of the wrong type for a field
    #[error("Invalid value for '{key}': expected {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// Numeric value outside the field's inclusive range
    #[error("Value {value} for '{key}' is out of range ({min}..={max})")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Text that could not be parsed into the field's type
    #[error("Cannot parse '{value}' for '{key}': {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Errors from parsing a `#RRGGBB` color spec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color '{0}' must start with '#'")]
    MissingHash(String),

    #[error("color '{0}' must have exactly 6 hex digits")]
    WrongLength(String),

    #[error("color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
