//! Profiler wiring and public entry point
//!
//! This module provides the ProfilerComponent that owns the CPU and heap
//! sampling engines and exposes them as the `timeProfiler` and
//! `heapProfiler` modules.
//!
//! # Example
//!
//! ```
//! use profiler_component::{ProfilerComponent, ProfilerConfig};
//!
//! let config = ProfilerConfig::builder()
//!     .sampling_interval_us(500)
//!     .include_line_info(true)
//!     .build();
//!
//! let profiler = ProfilerComponent::with_in_memory_engines(config).unwrap();
//! profiler.start_cpu_profile("startup");
//! let profile = profiler.stop_cpu_profile("startup");
//! assert_eq!(profile.title, "startup");
//! ```

mod component;
mod config;
mod error;

pub use component::ProfilerComponent;
pub use config::{ProfilerConfig, ProfilerConfigBuilder};
pub use error::{ComponentError, Result};
