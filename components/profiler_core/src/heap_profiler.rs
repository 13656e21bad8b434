//! Heap sampling controller

use profile_types::{AllocationProfileNode, ProfilerError, Result};
use tracing::{debug, warn};

use crate::engine::{AllocationProfileSnapshot, HeapSamplingEngine};
use crate::translate::translate_allocation_tree;
use crate::types::SamplingParams;

/// State of the heap sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapSamplingState {
    /// Not sampling
    Idle,
    /// Sampling with these parameters
    Sampling(SamplingParams),
}

/// Heap sampling controller
///
/// Like [`crate::TimeProfiler`], this owns a process-wide engine and expects
/// callers to serialize access.
#[derive(Debug)]
pub struct HeapProfiler<E: HeapSamplingEngine> {
    engine: E,
    state: HeapSamplingState,
}

impl<E: HeapSamplingEngine> HeapProfiler<E> {
    /// Take ownership of the engine
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: HeapSamplingState::Idle,
        }
    }

    /// The owned engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Current sampler state
    pub fn state(&self) -> HeapSamplingState {
        self.state
    }

    /// Whether the sampler is running
    pub fn is_sampling(&self) -> bool {
        matches!(self.state, HeapSamplingState::Sampling(_))
    }

    /// Start sampling, restarting with the new parameters if already running
    ///
    /// `None` uses the engine's defaults. Returns whether the engine is now
    /// sampling; a refused start leaves the controller idle.
    pub fn start_sampling(&mut self, params: Option<SamplingParams>) -> bool {
        let params = params.unwrap_or_else(|| self.engine.default_params());

        if self.is_sampling() {
            debug!("Restarting heap sampler");
            self.engine.stop_sampling();
        }

        let mut started = self.engine.start_sampling(params);
        if !started {
            // Sampler was started outside this controller; restart it
            warn!("Heap sampler already running in engine; restarting");
            self.engine.stop_sampling();
            started = self.engine.start_sampling(params);
        }

        if !started {
            warn!("Heap sampling engine refused to start");
            self.state = HeapSamplingState::Idle;
            return false;
        }

        debug!(
            "Heap sampling every {} bytes, stack depth {}",
            params.sample_interval_bytes, params.stack_depth
        );
        self.state = HeapSamplingState::Sampling(params);
        true
    }

    /// Stop sampling
    ///
    /// The engine is always told to stop, so a sampler started outside this
    /// controller is stopped too.
    pub fn stop_sampling(&mut self) {
        if !self.is_sampling() {
            debug!("Heap sampler idle; stopping engine anyway");
        }

        self.engine.stop_sampling();
        self.state = HeapSamplingState::Idle;
        debug!("Heap sampler stopped");
    }

    /// Translate the allocations accumulated so far
    ///
    /// Sampling keeps running. Fails with
    /// [`ProfilerError::EngineUnavailable`] when the engine has no profile,
    /// which includes the sampler not running.
    pub fn snapshot(&mut self) -> Result<AllocationProfileNode> {
        let snapshot = self.engine.allocation_profile().ok_or_else(|| {
            ProfilerError::EngineUnavailable("no allocation profile available".to_string())
        })?;

        let translated = snapshot.root().map(|root| translate_allocation_tree(root));
        snapshot.release();

        translated.ok_or_else(|| {
            ProfilerError::EngineUnavailable("allocation profile has no root".to_string())
        })
    }
}
