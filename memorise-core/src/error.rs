//! Error types for memorise.
//!
//! These cover configuration and argument parsing. Errors raised by a memoized
//! function or a custom key resolver never pass through this type: the wrapper
//! hands them back to the caller exactly as produced.

use thiserror::Error;

/// Result type alias using `MemoriseError`.
pub type Result<T> = std::result::Result<T, MemoriseError>;

/// Main error type for memorise configuration and tooling.
#[derive(Debug, Error)]
pub enum MemoriseError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A time-to-live of zero would expire every entry on insertion.
    #[error("Invalid time-to-live: must be greater than zero")]
    ZeroTimeToLive,

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MemoriseError {
    /// Returns true if this error came from configuration validation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MemoriseError::ConfigError(_) | MemoriseError::ZeroTimeToLive
        )
    }
}
