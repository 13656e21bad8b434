//! Main profiler component implementation

use crate::{ComponentError, ProfilerConfig, Result};
use module_host::ModuleHost;
use profile_types::{AllocationProfileNode, TimeProfile};
use profiler_core::{
    CpuSamplingEngine, HeapProfilerModule, HeapSamplingEngine, InMemoryCpuEngine,
    InMemoryHeapEngine, TimeProfilerModule,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Profiler component that owns both sampling engines and the module host
///
/// This component is responsible for:
/// - Validating the configuration and applying the CPU sampling interval
/// - Registering the `timeProfiler` and `heapProfiler` modules
/// - Routing host calls to those modules
///
/// Each engine is owned by exactly one controller, and each controller sits
/// behind its module's lock, so calls from several tasks are serialized.
///
/// # Example
///
/// ```
/// use profiler_component::{ProfilerComponent, ProfilerConfig};
///
/// let profiler = ProfilerComponent::with_in_memory_engines(ProfilerConfig::default()).unwrap();
/// assert_eq!(profiler.registered_modules(), vec!["heapProfiler", "timeProfiler"]);
/// ```
pub struct ProfilerComponent<C, H>
where
    C: CpuSamplingEngine + 'static,
    H: HeapSamplingEngine + 'static,
{
    /// Configuration for this component
    config: ProfilerConfig,

    /// Host that routes calls to the modules
    host: Arc<ModuleHost>,

    time_profiler: Arc<TimeProfilerModule<C>>,

    heap_profiler: Arc<HeapProfilerModule<H>>,
}

impl<C, H> ProfilerComponent<C, H>
where
    C: CpuSamplingEngine + 'static,
    H: HeapSamplingEngine + 'static,
{
    /// Create a new ProfilerComponent around the given engines
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfiguration`] if the heap settings
    /// in `config` are unusable.
    pub fn new(config: ProfilerConfig, cpu_engine: C, heap_engine: H) -> Result<Self> {
        debug!("Creating ProfilerComponent with config: {:?}", config);
        config.validate()?;

        let time_profiler = Arc::new(TimeProfilerModule::new(cpu_engine));
        time_profiler.with_profiler(|p| p.set_sampling_interval(config.sampling_interval_us()));

        let heap_profiler = Arc::new(HeapProfilerModule::new(heap_engine));

        let host = Arc::new(ModuleHost::new());
        host.register_module(time_profiler.clone());
        host.register_module(heap_profiler.clone());

        info!("Registered timeProfiler and heapProfiler modules");

        Ok(Self {
            config,
            host,
            time_profiler,
            heap_profiler,
        })
    }

    /// Get the component configuration
    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Get a handle to the module host
    pub fn host(&self) -> Arc<ModuleHost> {
        Arc::clone(&self.host)
    }

    /// Names of the registered modules, sorted
    pub fn registered_modules(&self) -> Vec<String> {
        self.host.module_names()
    }

    /// The `timeProfiler` module
    pub fn time_profiler(&self) -> &Arc<TimeProfilerModule<C>> {
        &self.time_profiler
    }

    /// The `heapProfiler` module
    pub fn heap_profiler(&self) -> &Arc<HeapProfilerModule<H>> {
        &self.heap_profiler
    }

    /// Call `module.method` with positional arguments
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        self.host
            .call(method, args)
            .await
            .map_err(ComponentError::from)
    }

    /// Handle a JSON call envelope and return the JSON reply
    pub async fn handle_message(&self, message: &str) -> String {
        self.host.handle_message(message).await
    }

    /// Start a CPU profile, using the configured line info setting
    pub fn start_cpu_profile(&self, name: &str) {
        let include_line_info = self.config.include_line_info();
        self.time_profiler
            .with_profiler(|p| p.start_profiling(name, include_line_info));
    }

    /// Stop a CPU profile, using the configured line info setting
    pub fn stop_cpu_profile(&self, name: &str) -> TimeProfile {
        let include_line_info = self.config.include_line_info();
        self.time_profiler
            .with_profiler(|p| p.stop_profiling(name, include_line_info))
    }

    /// Start heap sampling with the configured parameters
    pub fn start_heap_sampling(&self) {
        let params = self.config.heap_params();
        self.heap_profiler
            .with_profiler(|p| p.start_sampling(Some(params)));
    }

    /// Stop heap sampling
    pub fn stop_heap_sampling(&self) {
        self.heap_profiler.with_profiler(|p| p.stop_sampling());
    }

    /// Snapshot the allocations sampled so far
    pub fn allocation_profile(&self) -> Result<AllocationProfileNode> {
        Ok(self.heap_profiler.with_profiler(|p| p.snapshot())?)
    }
}

impl ProfilerComponent<InMemoryCpuEngine, InMemoryHeapEngine> {
    /// Create a component backed by the in-memory engines
    ///
    /// The heap engine's zero-argument defaults come from `config`.
    pub fn with_in_memory_engines(config: ProfilerConfig) -> Result<Self> {
        let heap_engine = InMemoryHeapEngine::with_defaults(config.heap_params());
        Self::new(config, InMemoryCpuEngine::new(), heap_engine)
    }

    /// Handle for feeding stack samples to the CPU engine
    pub fn cpu_engine(&self) -> InMemoryCpuEngine {
        self.time_profiler.with_profiler(|p| p.engine().clone())
    }

    /// Handle for feeding allocations to the heap engine
    pub fn heap_engine(&self) -> InMemoryHeapEngine {
        self.heap_profiler.with_profiler(|p| p.engine().clone())
    }
}
