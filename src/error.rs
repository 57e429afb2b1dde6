//! Error handling for oems-rs
//!
//! Every failure is fatal to the run. The variants separate the three ways
//! a run can fail (bad configuration, bad input, broken substrate) so the
//! binary can print a useful diagnostic before exiting non-zero.

use crate::network::error::{SubstrateError, TopologyError};
use thiserror::Error;

/// Main error type for oems-rs operations
#[derive(Error, Debug)]
pub enum OemsError {
    /// Wrong worker count or other launch-time misconfiguration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The wiring table failed validation
    #[error("Configuration error: invalid topology: {0}")]
    Topology(#[from] TopologyError),

    /// Input source missing or malformed
    #[error("Input error: {0}")]
    InputSource(String),

    /// A send or receive failed at the messaging layer
    #[error("Substrate error: {0}")]
    Substrate(#[from] SubstrateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<OemsError>,
    },
}

impl OemsError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        OemsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True for errors raised before any node ran.
    pub fn is_configuration(&self) -> bool {
        match self {
            OemsError::Configuration(_) | OemsError::Topology(_) => true,
            OemsError::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Result type alias for oems-rs operations
pub type Result<T> = std::result::Result<T, OemsError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
