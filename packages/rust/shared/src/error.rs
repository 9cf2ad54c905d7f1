//! Error types for Crumbtrail.
//!
//! Library crates use [`CrumbtrailError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Boxed error returned by caller-supplied callbacks (resolvers, hooks, formatters).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Crumbtrail operations.
#[derive(Debug, thiserror::Error)]
pub enum CrumbtrailError {
    /// Configuration loading or compilation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A caller-supplied callback (label formatter, skip predicate, id
    /// generator, plugin hook) failed. Aborts the whole generation call.
    #[error("callback `{hook}` failed: {message}")]
    Callback { hook: String, message: String },

    /// JSON/TOML (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CrumbtrailError>;

impl CrumbtrailError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a failed caller callback, naming the hook that raised it.
    pub fn callback(hook: impl Into<String>, source: BoxError) -> Self {
        Self::Callback {
            hook: hook.into(),
            message: source.to_string(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for CrumbtrailError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
