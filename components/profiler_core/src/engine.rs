//! Sampling engine seam
//!
//! The controllers never sample anything themselves. They drive an engine
//! through these traits and translate the snapshots it hands back. An engine
//! is a process-wide resource; exactly one controller should own it.

use crate::types::{AllocationRecord, LineTick, ProfilingMode, SamplingParams, StartStatus};

/// A node of the engine's CPU call tree
///
/// Accessors mirror what a native profiler exposes. Strings may be missing
/// and counts may be malformed; the translator normalizes both.
pub trait CallTreeNode {
    /// Function name, if the engine has one
    fn function_name(&self) -> Option<&str>;
    /// Script resource name, if known
    fn script_name(&self) -> Option<&str>;
    /// Script identifier
    fn script_id(&self) -> i64;
    /// Line number of the frame
    fn line_number(&self) -> i64;
    /// Column number of the frame
    fn column_number(&self) -> i64;
    /// Samples taken while this frame was on top of the stack
    fn hit_count(&self) -> i64;
    /// Number of callee nodes
    fn child_count(&self) -> usize;
    /// Callee at `index`, in engine order
    fn child(&self, index: usize) -> Option<&Self>;
    /// Per-line hit ticks, or `None` when the engine cannot report them
    fn line_ticks(&self) -> Option<Vec<LineTick>>;
}

/// A stopped CPU profile owned by the engine
pub trait CpuProfileSnapshot {
    /// Node type of the call tree
    type Node: CallTreeNode;

    /// Title the profile was started with
    fn title(&self) -> &str;
    /// Root of the top-down call tree
    fn top_down_root(&self) -> Option<&Self::Node>;
    /// Start timestamp (microseconds)
    fn start_time(&self) -> f64;
    /// End timestamp (microseconds)
    fn end_time(&self) -> f64;

    /// Free the engine-side snapshot
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// A CPU sampling engine
pub trait CpuSamplingEngine: Send {
    /// Snapshot type returned when a profile stops
    type Snapshot: CpuProfileSnapshot;

    /// Whether per-line caller granularity is available in this engine
    fn supports_line_info(&self) -> bool;

    /// Begin recording a profile under `title`
    fn start_profiling(&mut self, title: &str, mode: ProfilingMode) -> StartStatus;

    /// Stop the profile named `title`; `None` if no such profile is running
    fn stop_profiling(&mut self, title: &str) -> Option<Self::Snapshot>;

    /// Set the sampling interval for all running and future profiles
    fn set_sampling_interval(&mut self, interval_us: u32);
}

/// A call site in the engine's allocation tree
pub trait AllocationNode {
    /// Function name, if the engine has one
    fn name(&self) -> Option<&str>;
    /// Script resource name, if known
    fn script_name(&self) -> Option<&str>;
    /// Script identifier
    fn script_id(&self) -> i64;
    /// Line number of the call site
    fn line_number(&self) -> i64;
    /// Column number of the call site
    fn column_number(&self) -> i64;
    /// Number of callee call sites
    fn child_count(&self) -> usize;
    /// Callee at `index`, in engine order
    fn child(&self, index: usize) -> Option<&Self>;
    /// Allocation records attributed to this call site, in engine order
    fn allocations(&self) -> &[AllocationRecord];
}

/// A point-in-time allocation profile owned by the engine
pub trait AllocationProfileSnapshot {
    /// Node type of the allocation tree
    type Node: AllocationNode;

    /// Root call site
    fn root(&self) -> Option<&Self::Node>;

    /// Free the engine-side snapshot
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// A sampling heap profiler engine
pub trait HeapSamplingEngine: Send {
    /// Snapshot type returned by [`HeapSamplingEngine::allocation_profile`]
    type Snapshot: AllocationProfileSnapshot;

    /// Parameters used when sampling starts without explicit ones
    fn default_params(&self) -> SamplingParams;

    /// Start sampling; returns `false` if sampling was already running
    fn start_sampling(&mut self, params: SamplingParams) -> bool;

    /// Stop sampling and discard accumulated samples
    fn stop_sampling(&mut self);

    /// Current accumulated profile, or `None` if the engine cannot produce one
    fn allocation_profile(&mut self) -> Option<Self::Snapshot>;
}
