// Profiler error taxonomy and the codes it is reported to hosts under

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Codes carried by [`HostError`]
///
/// The first five follow JSON-RPC 2.0; the rest sit in its server-defined range.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_ARGUMENT: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    pub const NOT_FOUND: i32 = -32001;
    pub const INVALID_STATE: i32 = -32002;
    pub const ENGINE_UNAVAILABLE: i32 = -32003;
}

/// Error reported to a host caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostError {
    /// One of [`codes`]
    pub code: i32,
    /// Short description of the error class
    pub message: String,
    /// `{"method": ..}` or `{"details": ..}` for the errors that carry context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for HostError {}

impl HostError {
    /// Error with no attached data
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn detailed(code: i32, message: &str, key: &str, value: String) -> Self {
        let mut data = serde_json::Map::new();
        data.insert(key.to_string(), serde_json::Value::String(value));
        Self {
            code,
            message: message.to_string(),
            data: Some(serde_json::Value::Object(data)),
        }
    }

    /// The message was not JSON
    pub fn parse_error() -> Self {
        Self::new(codes::PARSE_ERROR, "Parse error")
    }

    /// The message was JSON but not a call envelope
    pub fn invalid_request() -> Self {
        Self::new(codes::INVALID_REQUEST, "Invalid Request")
    }

    /// No module or method under `method`
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::detailed(codes::METHOD_NOT_FOUND, "Method not found", "method", method.into())
    }

    /// Wrong arity or argument type on a module method
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::detailed(codes::INVALID_ARGUMENT, "Invalid argument", "details", details.into())
    }

    pub fn internal_error(details: impl Into<String>) -> Self {
        Self::detailed(codes::INTERNAL_ERROR, "Internal error", "details", details.into())
    }

    /// Whether the code is one of the profiler-defined ones
    pub fn is_profiler_error(&self) -> bool {
        (-32099..=-32000).contains(&self.code)
    }
}

/// Errors produced by the profiling controllers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfilerError {
    /// Wrong arity or argument type
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No profile or session with the given name
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation not valid in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The sampling engine could not produce a snapshot
    #[error("Sampling engine unavailable: {0}")]
    EngineUnavailable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ProfilerError {
    fn from(error: serde_json::Error) -> Self {
        ProfilerError::Serialization(error.to_string())
    }
}

impl ProfilerError {
    /// Host error code this error is reported under
    pub fn code(&self) -> i32 {
        match self {
            ProfilerError::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            ProfilerError::NotFound(_) => codes::NOT_FOUND,
            ProfilerError::InvalidState(_) => codes::INVALID_STATE,
            ProfilerError::EngineUnavailable(_) => codes::ENGINE_UNAVAILABLE,
            ProfilerError::Serialization(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<ProfilerError> for HostError {
    fn from(error: ProfilerError) -> Self {
        match error {
            ProfilerError::InvalidArgument(details) => HostError::invalid_argument(details),
            ProfilerError::Serialization(details) => HostError::internal_error(details),
            other => HostError::new(other.code(), other.to_string()),
        }
    }
}

/// Result type for profiler operations
pub type Result<T> = std::result::Result<T, ProfilerError>;
