//! Configuration for the profiler component

use profiler_core::SamplingParams;
use serde::{Deserialize, Serialize};

use crate::{ComponentError, Result};

/// Configuration for the profiler component
///
/// Holds the sampling settings applied when the component is wired up and
/// used by its convenience methods. Calls made through the module host carry
/// their own arguments and ignore these defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// CPU sampling interval in microseconds
    sampling_interval_us: u32,

    /// Average bytes between heap samples
    heap_sample_interval_bytes: u64,

    /// Maximum frames recorded per heap sample
    heap_stack_depth: i32,

    /// Whether CPU profiles record per-line ticks by default
    include_line_info: bool,
}

impl ProfilerConfig {
    /// Create a new builder for ProfilerConfig
    ///
    /// # Example
    ///
    /// ```
    /// use profiler_component::ProfilerConfig;
    ///
    /// let config = ProfilerConfig::builder()
    ///     .sampling_interval_us(500)
    ///     .include_line_info(true)
    ///     .build();
    /// ```
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Get the CPU sampling interval
    pub fn sampling_interval_us(&self) -> u32 {
        self.sampling_interval_us
    }

    /// Get the heap sampling interval
    pub fn heap_sample_interval_bytes(&self) -> u64 {
        self.heap_sample_interval_bytes
    }

    /// Get the heap stack depth
    pub fn heap_stack_depth(&self) -> i32 {
        self.heap_stack_depth
    }

    /// Get whether line info is requested by default
    pub fn include_line_info(&self) -> bool {
        self.include_line_info
    }

    /// Heap sampling parameters described by this config
    pub fn heap_params(&self) -> SamplingParams {
        SamplingParams {
            sample_interval_bytes: self.heap_sample_interval_bytes,
            stack_depth: self.heap_stack_depth,
        }
    }

    /// Check that the heap settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.heap_sample_interval_bytes == 0 {
            return Err(ComponentError::InvalidConfiguration(
                "heap_sample_interval_bytes must be greater than zero".to_string(),
            ));
        }
        if self.heap_stack_depth <= 0 {
            return Err(ComponentError::InvalidConfiguration(format!(
                "heap_stack_depth must be positive, got {}",
                self.heap_stack_depth
            )));
        }
        Ok(())
    }
}

impl Default for ProfilerConfig {
    /// Create a default configuration
    ///
    /// Default values:
    /// - sampling_interval_us: 1000
    /// - heap_sample_interval_bytes: 512 KiB
    /// - heap_stack_depth: 64
    /// - include_line_info: false
    fn default() -> Self {
        let heap = SamplingParams::default();
        Self {
            sampling_interval_us: 1000,
            heap_sample_interval_bytes: heap.sample_interval_bytes,
            heap_stack_depth: heap.stack_depth,
            include_line_info: false,
        }
    }
}

/// Builder for ProfilerConfig
#[derive(Debug, Clone, Default)]
pub struct ProfilerConfigBuilder {
    sampling_interval_us: Option<u32>,
    heap_sample_interval_bytes: Option<u64>,
    heap_stack_depth: Option<i32>,
    include_line_info: Option<bool>,
}

impl ProfilerConfigBuilder {
    /// Set the CPU sampling interval in microseconds
    pub fn sampling_interval_us(mut self, interval_us: u32) -> Self {
        self.sampling_interval_us = Some(interval_us);
        self
    }

    /// Set the average bytes between heap samples
    pub fn heap_sample_interval_bytes(mut self, bytes: u64) -> Self {
        self.heap_sample_interval_bytes = Some(bytes);
        self
    }

    /// Set the heap stack depth
    pub fn heap_stack_depth(mut self, depth: i32) -> Self {
        self.heap_stack_depth = Some(depth);
        self
    }

    /// Request per-line ticks by default
    pub fn include_line_info(mut self, enabled: bool) -> Self {
        self.include_line_info = Some(enabled);
        self
    }

    /// Build the ProfilerConfig
    ///
    /// Uses default values for any options not explicitly set. Values are
    /// checked when the component is created, not here.
    pub fn build(self) -> ProfilerConfig {
        let default = ProfilerConfig::default();

        ProfilerConfig {
            sampling_interval_us: self
                .sampling_interval_us
                .unwrap_or(default.sampling_interval_us),
            heap_sample_interval_bytes: self
                .heap_sample_interval_bytes
                .unwrap_or(default.heap_sample_interval_bytes),
            heap_stack_depth: self.heap_stack_depth.unwrap_or(default.heap_stack_depth),
            include_line_info: self.include_line_info.unwrap_or(default.include_line_info),
        }
    }
}
