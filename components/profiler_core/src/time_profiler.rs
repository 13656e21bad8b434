//! CPU profiling session controller
//!
//! Owns the process-wide CPU sampling engine and turns stopped engine
//! profiles into portable [`TimeProfile`] trees.

use profile_types::TimeProfile;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::engine::{CpuProfileSnapshot, CpuSamplingEngine};
use crate::translate::{translate_time_tree, TranslationMode};
use crate::types::{ProfilingMode, StartStatus};

/// A session the controller started and has not yet stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningSession {
    /// Session name (the engine profile title)
    pub name: String,
    /// Whether line info was requested at start
    pub include_line_info: bool,
    /// Granularity actually requested from the engine
    pub mode: ProfilingMode,
}

/// State of one named session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No session under this name
    Idle,
    /// Engine is recording under this name
    Running(RunningSession),
}

/// CPU profiling controller
///
/// Not safe to call concurrently: wrap it in a lock (the `timeProfiler`
/// module does) when more than one caller can reach it.
#[derive(Debug)]
pub struct TimeProfiler<E: CpuSamplingEngine> {
    engine: E,
    /// Read once at construction
    engine_supports_line_info: bool,
    sessions: HashMap<String, RunningSession>,
    sampling_interval_us: Option<u32>,
}

impl<E: CpuSamplingEngine> TimeProfiler<E> {
    /// Take ownership of the engine
    pub fn new(engine: E) -> Self {
        let engine_supports_line_info = engine.supports_line_info();
        debug!(
            "Creating time profiler (line info supported: {})",
            engine_supports_line_info
        );

        Self {
            engine,
            engine_supports_line_info,
            sessions: HashMap::new(),
            sampling_interval_us: None,
        }
    }

    /// Whether the engine can record per-line caller ticks
    pub fn engine_supports_line_info(&self) -> bool {
        self.engine_supports_line_info
    }

    /// The owned engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Last interval set through this controller, if any
    pub fn sampling_interval(&self) -> Option<u32> {
        self.sampling_interval_us
    }

    /// State of the session called `name`
    pub fn session_state(&self, name: &str) -> SessionState {
        match self.sessions.get(name) {
            Some(session) => SessionState::Running(session.clone()),
            None => SessionState::Idle,
        }
    }

    /// Names of all running sessions, sorted
    pub fn running_sessions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Start recording a profile called `name`
    ///
    /// Line info is silently unavailable on engines without caller-line
    /// support. Starting a name that is already running changes nothing.
    pub fn start_profiling(&mut self, name: &str, include_line_info: bool) {
        let mode = if include_line_info && self.engine_supports_line_info {
            ProfilingMode::CallerLineNumbers
        } else {
            ProfilingMode::LeafNodeLineNumbers
        };

        if include_line_info && !self.engine_supports_line_info {
            debug!("Line info requested for '{}' but not supported by engine", name);
        }

        match self.engine.start_profiling(name, mode) {
            StartStatus::Started => {
                debug!("Started CPU profile '{}' ({:?})", name, mode);
                self.sessions.insert(
                    name.to_string(),
                    RunningSession {
                        name: name.to_string(),
                        include_line_info,
                        mode,
                    },
                );
            }
            StartStatus::AlreadyStarted => {
                warn!("CPU profile '{}' is already running", name);
            }
        }
    }

    /// Stop the profile called `name` and translate it
    ///
    /// A name that was never started yields [`TimeProfile::empty`]. The
    /// engine snapshot is released before returning.
    pub fn stop_profiling(&mut self, name: &str, include_line_info: bool) -> TimeProfile {
        self.sessions.remove(name);

        let snapshot = match self.engine.stop_profiling(name) {
            Some(snapshot) => snapshot,
            None => {
                debug!("No CPU profile named '{}'; returning empty profile", name);
                return TimeProfile::empty(name);
            }
        };

        let mode = TranslationMode::select(include_line_info, self.engine_supports_line_info);
        if include_line_info && mode == TranslationMode::Plain {
            warn!("Line info unavailable for '{}'; translating without it", name);
        }

        let profile = TimeProfile {
            title: snapshot.title().to_string(),
            top_down_root: snapshot
                .top_down_root()
                .map(|root| translate_time_tree(root, mode)),
            start_time: snapshot.start_time(),
            end_time: snapshot.end_time(),
        };
        snapshot.release();

        debug!(
            "Stopped CPU profile '{}' ({} nodes)",
            name,
            profile
                .top_down_root
                .as_ref()
                .map(|root| root.node_count())
                .unwrap_or(0)
        );

        profile
    }

    /// Set the process-wide sampling interval
    pub fn set_sampling_interval(&mut self, interval_us: u32) {
        debug!("Setting CPU sampling interval to {} microseconds", interval_us);
        self.engine.set_sampling_interval(interval_us);
        self.sampling_interval_us = Some(interval_us);
    }
}
