// Profile tree types, host call envelopes, and error definitions
//
// This crate holds the portable output model shared by the profiler
// controllers and the module host.

pub mod errors;
pub mod profiles;

// Re-export commonly used types
pub use errors::{codes, HostError, ProfilerError, Result};
pub use profiles::allocation::{Allocation, AllocationProfileNode};
pub use profiles::time::{TimeProfile, TimeProfileNode};

use serde::{Deserialize, Serialize};

/// Host call message
/// A method invocation on a registered module, with positional arguments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostCall {
    /// Unique identifier for this call
    pub id: u64,
    /// Method name in format "module.method"
    pub method: String,
    /// Positional arguments, in call order
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
}

/// Host reply message
/// Carries either the method's return value or an error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostReply {
    /// Call ID this reply corresponds to
    pub id: u64,
    /// Return value of the method (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (if the method failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<errors::HostError>,
}
