//! In-memory reference engines
//!
//! Engines whose samples are pushed in explicitly. They back the default
//! component wiring and make the controllers testable without a native
//! profiler.

mod cpu;
mod heap;

pub use cpu::{InMemoryCpuEngine, InMemoryCpuProfile, RecordedNode, DEFAULT_SAMPLING_INTERVAL_US};
pub use heap::{AllocationSite, InMemoryAllocationProfile, InMemoryHeapEngine};

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in microseconds
fn get_timestamp_micros() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as f64)
        .unwrap_or(0.0)
}
