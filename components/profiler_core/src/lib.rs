//! CPU and heap profiling controllers
//!
//! This crate drives a sampling engine and turns what it records into the
//! portable trees defined in `profile_types`.
//!
//! # Features
//!
//! - **TimeProfiler**: named CPU profiling sessions with optional per-line ticks
//! - **HeapProfiler**: sampling heap profiler with live allocation snapshots
//! - **Translators**: iterative engine-tree to output-tree conversion
//! - **In-memory engines**: sample-fed engines for wiring and tests
//! - **Modules**: `timeProfiler` and `heapProfiler` handlers for the module host

pub mod engine;
pub mod in_memory;
pub mod translate;

mod heap_profiler;
mod heap_profiler_module;
mod time_profiler;
mod time_profiler_module;
mod types;

pub use engine::{
    AllocationNode, AllocationProfileSnapshot, CallTreeNode, CpuProfileSnapshot,
    CpuSamplingEngine, HeapSamplingEngine,
};
pub use heap_profiler::{HeapProfiler, HeapSamplingState};
pub use heap_profiler_module::{HeapProfilerModule, HEAP_PROFILER_MODULE};
pub use in_memory::{InMemoryCpuEngine, InMemoryHeapEngine};
pub use time_profiler::{RunningSession, SessionState, TimeProfiler};
pub use time_profiler_module::{TimeProfilerModule, TIME_PROFILER_MODULE};
pub use translate::{translate_allocation_tree, translate_time_tree, TranslationMode};
pub use types::*;
