//! `heapProfiler` module
//!
//! Exposes a [`HeapProfiler`] to the module host.

use async_trait::async_trait;
use module_host::{expect_arity, expect_i32, expect_u32, ModuleHandler};
use parking_lot::Mutex;
use profile_types::{HostError, ProfilerError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::engine::HeapSamplingEngine;
use crate::heap_profiler::HeapProfiler;
use crate::types::SamplingParams;

/// Module name the host routes on
pub const HEAP_PROFILER_MODULE: &str = "heapProfiler";

/// The `heapProfiler` module
pub struct HeapProfilerModule<E: HeapSamplingEngine> {
    profiler: Mutex<HeapProfiler<E>>,
}

impl<E: HeapSamplingEngine> HeapProfilerModule<E> {
    /// Wrap an engine in a fresh controller
    pub fn new(engine: E) -> Self {
        Self {
            profiler: Mutex::new(HeapProfiler::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the controller
    pub fn with_profiler<R>(&self, f: impl FnOnce(&mut HeapProfiler<E>) -> R) -> R {
        f(&mut *self.profiler.lock())
    }

    /// Handle the startSamplingHeapProfiler method
    ///
    /// Accepts either no arguments (engine defaults) or
    /// `(sampleIntervalBytes: uint32, stackDepth: int)`.
    fn handle_start_sampling(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        let params = match args.len() {
            0 => None,
            2 => Some(SamplingParams {
                sample_interval_bytes: u64::from(expect_u32(args, 0)?),
                stack_depth: expect_i32(args, 1)?,
            }),
            n => {
                return Err(ProfilerError::InvalidArgument(format!(
                    "startSamplingHeapProfiler must have 0 or 2 arguments, got {}",
                    n
                )))
            }
        };

        debug!("heapProfiler.startSamplingHeapProfiler called with {:?}", params);
        self.profiler.lock().start_sampling(params);

        Ok(Value::Null)
    }

    /// Handle the stopSamplingHeapProfiler method
    fn handle_stop_sampling(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        expect_arity("stopSamplingHeapProfiler", args, 0)?;

        debug!("heapProfiler.stopSamplingHeapProfiler called");
        self.profiler.lock().stop_sampling();

        Ok(Value::Null)
    }

    /// Handle the getAllocationProfile method
    fn handle_get_allocation_profile(&self, args: &[Value]) -> Result<Value, ProfilerError> {
        expect_arity("getAllocationProfile", args, 0)?;

        debug!("heapProfiler.getAllocationProfile called");
        let root = self.profiler.lock().snapshot()?;

        Ok(serde_json::to_value(root)?)
    }
}

#[async_trait]
impl<E> ModuleHandler for HeapProfilerModule<E>
where
    E: HeapSamplingEngine + 'static,
{
    fn name(&self) -> &str {
        HEAP_PROFILER_MODULE
    }

    async fn handle_method(&self, method: &str, args: Vec<Value>) -> Result<Value, HostError> {
        debug!("heapProfiler module handling method: {}", method);

        let result = match method {
            "startSamplingHeapProfiler" => self.handle_start_sampling(&args),
            "stopSamplingHeapProfiler" => self.handle_stop_sampling(&args),
            "getAllocationProfile" => self.handle_get_allocation_profile(&args),
            _ => {
                warn!("Unknown heapProfiler method: {}", method);
                return Err(HostError::method_not_found(format!(
                    "{}.{}",
                    HEAP_PROFILER_MODULE, method
                )));
            }
        };

        result.map_err(HostError::from)
    }
}
