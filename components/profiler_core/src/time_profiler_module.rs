//! `timeProfiler` module
//!
//! Exposes a [`TimeProfiler`] to the module host with positional argument
//! validation.

use async_trait::async_trait;
use module_host::{expect_arity, expect_bool, expect_string, expect_u32, ModuleHandler};
use parking_lot::Mutex;
use profile_types::{HostError, ProfilerError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::CpuSamplingEngine;
use crate::time_profiler::TimeProfiler;

/// Module name the host routes on
pub const TIME_PROFILER_MODULE: &str = "timeProfiler";

/// The `timeProfiler` module
pub struct TimeProfilerModule<E: CpuSamplingEngine> {
    profiler: Mutex<TimeProfiler<E>>,
}

impl<E: CpuSamplingEngine> TimeProfilerModule<E> {
    /// Wrap an engine in a fresh controller
    pub fn new(engine: E) -> Self {
        Self::from_profiler(TimeProfiler::new(engine))
    }

    /// Wrap an existing controller
    pub fn from_profiler(profiler: TimeProfiler<E>) -> Self {
        Self {
            profiler: Mutex::new(profiler),
        }
    }

    /// Run `f` with exclusive access to the controller
    pub fn with_profiler<R>(&self, f: impl FnOnce(&mut TimeProfiler<E>) -> R) -> R {
        f(&mut *self.profiler.lock())
    }

    /// Handle the startProfiling method
    fn handle_start_profiling(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        expect_arity("startProfiling", args, 2)?;
        let name = expect_string(args, 0)?;
        let include_line_info = expect_bool(args, 1)?;

        debug!("timeProfiler.startProfiling called for '{}'", name);
        self.profiler.lock().start_profiling(name, include_line_info);

        Ok(Value::Null)
    }

    /// Handle the stopProfiling method
    fn handle_stop_profiling(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        expect_arity("stopProfiling", args, 2)?;
        let name = expect_string(args, 0)?;
        let include_line_info = expect_bool(args, 1)?;

        debug!("timeProfiler.stopProfiling called for '{}'", name);
        let profile = self.profiler.lock().stop_profiling(name, include_line_info);

        Ok(serde_json::to_value(profile)?)
    }

    /// Handle the setSamplingInterval method
    fn handle_set_sampling_interval(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        expect_arity("setSamplingInterval", args, 1)?;
        let interval_us = expect_u32(args, 0)?;

        self.profiler.lock().set_sampling_interval(interval_us);

        Ok(Value::Null)
    }
}

#[async_trait]
impl<E> ModuleHandler for TimeProfilerModule<E>
where
    E: CpuSamplingEngine + 'static,
{
    fn name(&self) -> &str {
        TIME_PROFILER_MODULE
    }

    async fn handle_method(&self, method: &str, args: Vec<Value>) -> Result<Value, HostError> {
        debug!("timeProfiler module handling method: {}", method);

        let result = match method {
            "startProfiling" => self.handle_start_profiling(&args),
            "stopProfiling" => self.handle_stop_profiling(&args),
            "setSamplingInterval" => self.handle_set_sampling_interval(&args),
            _ => {
                warn!("Unknown timeProfiler method: {}", method);
                return Err(HostError::method_not_found(format!(
                    "{}.{}",
                    TIME_PROFILER_MODULE, method
                )));
            }
        };

        result.map_err(HostError::from)
    }
}
