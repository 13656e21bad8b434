//! Error types for the profiler component

use profile_types::{HostError, ProfilerError};
use thiserror::Error;

/// Errors that can occur while wiring or driving the profiler component
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Controller error
    #[error("Profiler error: {0}")]
    Profiler(#[from] ProfilerError),

    /// Error returned by a module call
    #[error("{0}")]
    Host(#[from] HostError),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for component operations
pub type Result<T> = std::result::Result<T, ComponentError>;
