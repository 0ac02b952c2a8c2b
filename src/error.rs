//! Error types for the FA port inventory
//!
//! Provides structured error types for SYMCLI invocation, XML decoding,
//! registry integrity and configuration.

use thiserror::Error;

/// Unified error type for inventory collection
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // SYMCLI Invocation Errors
    // =========================================================================
    #[error("{query} query: failed to run {command}: {reason}")]
    CommandLaunch {
        query: String,
        command: String,
        reason: String,
    },

    #[error("{query} query: {command} exited with {status}: {stderr}")]
    CommandFailed {
        query: String,
        command: String,
        status: String,
        stderr: String,
    },

    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("{query} query: XML parse error: {reason}")]
    XmlParse { query: String, reason: String },

    #[error("{query} query: missing <{element}> in output")]
    MissingElement { query: String, element: String },

    #[error("{query} query: invalid value for {field}: {value:?}")]
    InvalidValue {
        query: String,
        field: String,
        value: String,
    },

    // =========================================================================
    // Registry Integrity Errors
    // =========================================================================
    #[error("{query} query: port {director}:{port} was not enumerated as enabled")]
    UnknownPort {
        query: String,
        director: String,
        port: String,
    },

    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad class of a failure, used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The external tool could not be run or read
    Invocation,
    /// The tool's output did not have the expected shape
    Structural,
    /// A later pass referenced a port the first pass never created
    Integrity,
    /// Bad command line or configuration
    Argument,
}

impl Error {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::CommandLaunch { .. } | Error::CommandFailed { .. } | Error::Io(_) => {
                ErrorCategory::Invocation
            }
            Error::XmlParse { .. } | Error::MissingElement { .. } | Error::InvalidValue { .. } => {
                ErrorCategory::Structural
            }
            Error::UnknownPort { .. } => ErrorCategory::Integrity,
            Error::Configuration(_) => ErrorCategory::Argument,
        }
    }

    /// Process exit status for this error. Every failure is terminal.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, Error>;
