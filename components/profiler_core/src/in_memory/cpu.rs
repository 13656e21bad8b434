//! In-memory CPU sampling engine
//!
//! Builds call trees from stack samples pushed in by a sampler thread (or a
//! test). Several titled profiles may record at once; every sample lands in
//! all of them.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::get_timestamp_micros;
use crate::engine::{CallTreeNode, CpuProfileSnapshot, CpuSamplingEngine};
use crate::types::{CallFrame, LineTick, ProfilingMode, StartStatus};

/// Default sampling interval in microseconds
pub const DEFAULT_SAMPLING_INTERVAL_US: u32 = 1000;

/// A node of a recorded call tree
#[derive(Debug)]
pub struct RecordedNode {
    frame: CallFrame,
    hit_count: u32,
    /// `None` unless the profile records caller line numbers
    line_ticks: Option<Vec<LineTick>>,
    children: Vec<RecordedNode>,
}

impl RecordedNode {
    fn new(frame: CallFrame, mode: ProfilingMode) -> Self {
        Self {
            frame,
            hit_count: 0,
            line_ticks: match mode {
                ProfilingMode::CallerLineNumbers => Some(Vec::new()),
                ProfilingMode::LeafNodeLineNumbers => None,
            },
            children: Vec::new(),
        }
    }

    /// Call frame of this node
    pub fn frame(&self) -> &CallFrame {
        &self.frame
    }

    fn record_line(&mut self, line: i64) {
        if let Some(ref mut ticks) = self.line_ticks {
            if let Some(tick) = ticks.iter_mut().find(|t| t.line == line) {
                tick.hit_count += 1;
            } else {
                ticks.push(LineTick { line, hit_count: 1 });
            }
        }
    }
}

impl Drop for RecordedNode {
    // Samples can be arbitrarily deep; release the tree level by level
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl CallTreeNode for RecordedNode {
    fn function_name(&self) -> Option<&str> {
        Some(&self.frame.function_name)
    }

    fn script_name(&self) -> Option<&str> {
        Some(&self.frame.script_name)
    }

    fn script_id(&self) -> i64 {
        self.frame.script_id
    }

    fn line_number(&self) -> i64 {
        self.frame.line_number
    }

    fn column_number(&self) -> i64 {
        self.frame.column_number
    }

    fn hit_count(&self) -> i64 {
        i64::from(self.hit_count)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    fn line_ticks(&self) -> Option<Vec<LineTick>> {
        self.line_ticks.clone()
    }
}

#[derive(Debug)]
struct Recording {
    title: String,
    mode: ProfilingMode,
    start_time: f64,
    root: RecordedNode,
}

#[derive(Debug)]
struct CpuEngineState {
    sampling_interval_us: u32,
    recordings: Vec<Recording>,
}

/// A stopped profile handed out by [`InMemoryCpuEngine`]
#[derive(Debug)]
pub struct InMemoryCpuProfile {
    title: String,
    root: RecordedNode,
    start_time: f64,
    end_time: f64,
    released: Arc<AtomicUsize>,
}

impl CpuProfileSnapshot for InMemoryCpuProfile {
    type Node = RecordedNode;

    fn title(&self) -> &str {
        &self.title
    }

    fn top_down_root(&self) -> Option<&RecordedNode> {
        Some(&self.root)
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn end_time(&self) -> f64 {
        self.end_time
    }

    fn release(self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Cloneable handle to an in-memory CPU sampling engine
///
/// Clones share state: hand one clone to the controller and keep another to
/// feed samples.
#[derive(Debug, Clone)]
pub struct InMemoryCpuEngine {
    state: Arc<RwLock<CpuEngineState>>,
    supports_line_info: bool,
    released: Arc<AtomicUsize>,
}

impl InMemoryCpuEngine {
    /// Create an engine with per-line caller support
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Create an engine that cannot record per-line ticks
    pub fn without_line_info() -> Self {
        Self::build(false)
    }

    fn build(supports_line_info: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(CpuEngineState {
                sampling_interval_us: DEFAULT_SAMPLING_INTERVAL_US,
                recordings: Vec::new(),
            })),
            supports_line_info,
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Current sampling interval in microseconds
    pub fn sampling_interval(&self) -> u32 {
        self.state.read().sampling_interval_us
    }

    /// Titles of the profiles currently recording, in start order
    pub fn running_titles(&self) -> Vec<String> {
        self.state
            .read()
            .recordings
            .iter()
            .map(|r| r.title.clone())
            .collect()
    }

    /// Number of snapshots released back to the engine
    pub fn released_snapshots(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Record one stack sample into every running profile
    ///
    /// `call_stack` runs outermost first; the last frame takes the hit.
    /// `current_line` is the source line executing in that frame.
    /// Returns the number of profiles that received the sample.
    pub fn record_sample(&self, call_stack: &[CallFrame], current_line: i64) -> usize {
        let mut state = self.state.write();

        for recording in state.recordings.iter_mut() {
            let mode = recording.mode;
            let mut node = &mut recording.root;

            for frame in call_stack {
                let position = node.children.iter().position(|child| {
                    child.frame.function_name == frame.function_name
                        && child.frame.script_id == frame.script_id
                        && child.frame.line_number == frame.line_number
                        && child.frame.column_number == frame.column_number
                });

                let index = match position {
                    Some(index) => index,
                    None => {
                        node.children.push(RecordedNode::new(frame.clone(), mode));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[index];
            }

            node.hit_count += 1;
            node.record_line(current_line);
        }

        state.recordings.len()
    }
}

impl Default for InMemoryCpuEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSamplingEngine for InMemoryCpuEngine {
    type Snapshot = InMemoryCpuProfile;

    fn supports_line_info(&self) -> bool {
        self.supports_line_info
    }

    fn start_profiling(&mut self, title: &str, mode: ProfilingMode) -> StartStatus {
        let mut state = self.state.write();

        if state.recordings.iter().any(|r| r.title == title) {
            return StartStatus::AlreadyStarted;
        }

        let mode = if self.supports_line_info {
            mode
        } else {
            ProfilingMode::LeafNodeLineNumbers
        };

        debug!("Engine recording profile '{}' in {:?} mode", title, mode);
        state.recordings.push(Recording {
            title: title.to_string(),
            mode,
            start_time: get_timestamp_micros(),
            root: RecordedNode::new(CallFrame::root(), mode),
        });

        StartStatus::Started
    }

    fn stop_profiling(&mut self, title: &str) -> Option<InMemoryCpuProfile> {
        let mut state = self.state.write();
        let index = state.recordings.iter().position(|r| r.title == title)?;
        let recording = state.recordings.remove(index);

        Some(InMemoryCpuProfile {
            title: recording.title,
            root: recording.root,
            start_time: recording.start_time,
            end_time: get_timestamp_micros().max(recording.start_time),
            released: Arc::clone(&self.released),
        })
    }

    fn set_sampling_interval(&mut self, interval_us: u32) {
        self.state.write().sampling_interval_us = interval_us;
    }
}
