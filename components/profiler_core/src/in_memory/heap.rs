//! In-memory sampling heap engine
//!
//! Aggregates sampled allocations into a call-site tree. Allocations are
//! reported already sampled; the engine only truncates stacks and groups
//! records by size.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::engine::{AllocationNode, AllocationProfileSnapshot, HeapSamplingEngine};
use crate::types::{AllocationRecord, CallFrame, SamplingParams};

/// A call site of the recorded allocation tree
#[derive(Debug)]
pub struct AllocationSite {
    frame: CallFrame,
    allocations: Vec<AllocationRecord>,
    children: Vec<AllocationSite>,
}

/// A site whose children are still being copied
struct PendingCopy<'a> {
    source: &'a AllocationSite,
    next_child: usize,
    copy: AllocationSite,
}

impl<'a> PendingCopy<'a> {
    fn enter(source: &'a AllocationSite) -> Self {
        Self {
            source,
            next_child: 0,
            copy: AllocationSite {
                frame: source.frame.clone(),
                allocations: source.allocations.clone(),
                children: Vec::with_capacity(source.children.len()),
            },
        }
    }
}

impl AllocationSite {
    fn new(frame: CallFrame) -> Self {
        Self {
            frame,
            allocations: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Copy the whole subtree without recursing per level
    fn deep_copy(&self) -> Self {
        let mut stack = vec![PendingCopy::enter(self)];

        loop {
            let Some(top) = stack.last_mut() else {
                return AllocationSite::new(CallFrame::root());
            };

            let source = top.source;
            if let Some(child) = source.children.get(top.next_child) {
                top.next_child += 1;
                stack.push(PendingCopy::enter(child));
                continue;
            }

            if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => parent.copy.children.push(done.copy),
                    None => return done.copy,
                }
            }
        }
    }

    fn record(&mut self, size: u64) {
        if let Some(record) = self.allocations.iter_mut().find(|r| r.size == size) {
            record.count += 1;
        } else {
            self.allocations.push(AllocationRecord { size, count: 1 });
        }
    }
}

impl Clone for AllocationSite {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

impl Drop for AllocationSite {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl AllocationNode for AllocationSite {
    fn name(&self) -> Option<&str> {
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

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    fn allocations(&self) -> &[AllocationRecord] {
        &self.allocations
    }
}

#[derive(Debug)]
struct HeapEngineState {
    /// `Some` while sampling
    active: Option<SamplingParams>,
    root: AllocationSite,
}

/// A point-in-time copy of the allocation tree
#[derive(Debug)]
pub struct InMemoryAllocationProfile {
    root: AllocationSite,
    released: Arc<AtomicUsize>,
}

impl AllocationProfileSnapshot for InMemoryAllocationProfile {
    type Node = AllocationSite;

    fn root(&self) -> Option<&AllocationSite> {
        Some(&self.root)
    }

    fn release(self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Cloneable handle to an in-memory heap sampling engine
#[derive(Debug, Clone)]
pub struct InMemoryHeapEngine {
    state: Arc<RwLock<HeapEngineState>>,
    defaults: SamplingParams,
    released: Arc<AtomicUsize>,
}

impl InMemoryHeapEngine {
    /// Create an engine with the stock defaults
    pub fn new() -> Self {
        Self::with_defaults(SamplingParams::default())
    }

    /// Create an engine whose zero-argument start uses `defaults`
    pub fn with_defaults(defaults: SamplingParams) -> Self {
        Self {
            state: Arc::new(RwLock::new(HeapEngineState {
                active: None,
                root: AllocationSite::new(CallFrame::root()),
            })),
            defaults,
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Parameters of the running sampler, if any
    pub fn active_params(&self) -> Option<SamplingParams> {
        self.state.read().active
    }

    /// Number of snapshots released back to the engine
    pub fn released_snapshots(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Record a sampled allocation
    ///
    /// `call_stack` runs outermost first. Only the innermost `stack_depth`
    /// frames are kept so the allocation stays attributed to its exact call
    /// site. Returns `false` when not sampling or `size` is zero.
    pub fn record_allocation(&self, size: u64, call_stack: &[CallFrame]) -> bool {
        let mut state = self.state.write();

        let params = match state.active {
            Some(params) => params,
            None => return false,
        };
        if size == 0 {
            return false;
        }

        let depth = usize::try_from(params.stack_depth).unwrap_or(0);
        let kept = &call_stack[call_stack.len().saturating_sub(depth)..];

        let mut site = &mut state.root;
        for frame in kept {
            let index = match site.children.iter().position(|c| c.frame == *frame) {
                Some(index) => index,
                None => {
                    site.children.push(AllocationSite::new(frame.clone()));
                    site.children.len() - 1
                }
            };
            site = &mut site.children[index];
        }
        site.record(size);

        true
    }
}

impl Default for InMemoryHeapEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeapSamplingEngine for InMemoryHeapEngine {
    type Snapshot = InMemoryAllocationProfile;

    fn default_params(&self) -> SamplingParams {
        self.defaults
    }

    fn start_sampling(&mut self, params: SamplingParams) -> bool {
        let mut state = self.state.write();
        if state.active.is_some() {
            return false;
        }

        debug!(
            "Engine sampling heap every {} bytes, depth {}",
            params.sample_interval_bytes, params.stack_depth
        );
        state.active = Some(params);
        state.root = AllocationSite::new(CallFrame::root());
        true
    }

    fn stop_sampling(&mut self) {
        let mut state = self.state.write();
        state.active = None;
        state.root = AllocationSite::new(CallFrame::root());
    }

    fn allocation_profile(&mut self) -> Option<InMemoryAllocationProfile> {
        let state = self.state.read();
        if state.active.is_none() {
            return None;
        }

        Some(InMemoryAllocationProfile {
            root: state.root.clone(),
            released: Arc::clone(&self.released),
        })
    }
}
