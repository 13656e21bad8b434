//! CPU and heap profiling for an embedded script engine
//!
//! This crate re-exports the profiler components behind one import path.
//! Most embedders only need [`ProfilerComponent`] and [`ProfilerConfig`].
//!
//! # Example
//!
//! ```
//! use pprof_bindings::{ProfilerComponent, ProfilerConfig};
//!
//! let profiler = ProfilerComponent::with_in_memory_engines(ProfilerConfig::default()).unwrap();
//!
//! profiler.start_heap_sampling();
//! let root = profiler.allocation_profile().unwrap();
//! assert!(root.children.is_empty());
//! profiler.stop_heap_sampling();
//! ```

#![warn(missing_docs)]

pub use module_host::{ModuleHandler, ModuleHost};
pub use profile_types::{
    Allocation, AllocationProfileNode, HostCall, HostError, HostReply, ProfilerError,
    TimeProfile, TimeProfileNode,
};
pub use profiler_component::{ComponentError, ProfilerComponent, ProfilerConfig, Result};

/// Engine seam, controllers, and in-memory engines
pub use profiler_core;
