//! Engine-side type definitions
//!
//! Raw records exchanged with a sampling engine. The portable output trees
//! live in `profile_types`.

use serde::{Deserialize, Serialize};

// ============================================================================
// CPU sampling
// ============================================================================

/// Granularity the CPU engine records line information at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfilingMode {
    /// Line numbers only for the leaf frame; no per-line ticks
    LeafNodeLineNumbers,
    /// Per-line hit ticks recorded for every frame
    CallerLineNumbers,
}

/// Outcome of asking the engine to start a named profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartStatus {
    /// A new profile was started
    Started,
    /// A profile with this title was already running; nothing changed
    AlreadyStarted,
}

/// Samples attributed to one source line within a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTick {
    /// Source line number
    pub line: i64,
    /// Number of samples at this line
    pub hit_count: i64,
}

/// Call frame reported by a stack sample
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Function name
    pub function_name: String,
    /// Script resource name
    pub script_name: String,
    /// Script ID
    pub script_id: i64,
    /// Line number of the function
    pub line_number: i64,
    /// Column number of the function
    pub column_number: i64,
}

impl CallFrame {
    /// Create a frame
    pub fn new(
        function_name: impl Into<String>,
        script_name: impl Into<String>,
        script_id: i64,
        line_number: i64,
        column_number: i64,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            script_name: script_name.into(),
            script_id,
            line_number,
            column_number,
        }
    }

    /// The synthetic frame at the top of every tree
    pub fn root() -> Self {
        Self::new("(root)", "", 0, 0, 0)
    }
}

// ============================================================================
// Heap sampling
// ============================================================================

/// Parameters for the sampling heap profiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    /// Average number of bytes between samples
    pub sample_interval_bytes: u64,
    /// Maximum number of frames recorded per sample
    pub stack_depth: i32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            sample_interval_bytes: 512 * 1024,
            stack_depth: 64,
        }
    }
}

/// Sampled allocations of one size at a call site, as the engine reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRecord {
    /// Allocation size in bytes
    pub size: u64,
    /// Number of sampled allocations of that size
    pub count: u64,
}
