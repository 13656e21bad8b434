//! Unit tests for HeapProfiler

use profile_types::ProfilerError;
use profiler_core::{CallFrame, HeapProfiler, HeapSamplingState, InMemoryHeapEngine, SamplingParams};

fn frame(name: &str) -> CallFrame {
    CallFrame::new(name, "alloc.js", 7, 3, 1)
}

fn params(sample_interval_bytes: u64, stack_depth: i32) -> SamplingParams {
    SamplingParams {
        sample_interval_bytes,
        stack_depth,
    }
}

#[test]
fn test_snapshot_allocations_are_positive() {
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());

    profiler.start_sampling(Some(params(1024, 16)));
    engine.record_allocation(48, &[frame("make")]);
    engine.record_allocation(0, &[frame("make")]);
    engine.record_allocation(48, &[frame("make"), frame("inner")]);

    let root = profiler.snapshot().unwrap();
    let mut pending = vec![&root];
    let mut seen = 0;
    while let Some(node) = pending.pop() {
        for allocation in &node.allocations {
            assert!(allocation.size_bytes > 0.0);
            assert!(allocation.count > 0.0);
            seen += 1;
        }
        pending.extend(node.children.iter());
    }
    assert_eq!(seen, 2);
}

#[test]
fn test_snapshots_accumulate_while_sampling() {
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());
    profiler.start_sampling(None);

    engine.record_allocation(100, &[frame("a")]);
    let first = profiler.snapshot().unwrap();

    engine.record_allocation(100, &[frame("a")]);
    engine.record_allocation(200, &[frame("b")]);
    let second = profiler.snapshot().unwrap();

    assert!(second.total_count() >= first.total_count());
    assert!(second.total_bytes() >= first.total_bytes());
    assert_eq!(second.total_count(), 3.0);
    assert_eq!(second.total_bytes(), 400.0);
    assert_eq!(engine.released_snapshots(), 2);
}

#[test]
fn test_allocation_records_are_not_merged() {
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());
    profiler.start_sampling(None);

    engine.record_allocation(16, &[frame("a")]);
    engine.record_allocation(32, &[frame("a")]);
    engine.record_allocation(16, &[frame("a")]);

    let root = profiler.snapshot().unwrap();
    let site = &root.children[0];
    assert_eq!(site.name, "a");
    assert_eq!(site.allocations.len(), 2);
    assert_eq!(site.allocations[0].size_bytes, 16.0);
    assert_eq!(site.allocations[0].count, 2.0);
    assert_eq!(site.allocations[1].size_bytes, 32.0);
    assert_eq!(site.allocations[1].count, 1.0);
}

#[test]
fn test_stop_discards_samples() {
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());

    profiler.start_sampling(None);
    engine.record_allocation(64, &[frame("a")]);
    profiler.stop_sampling();

    assert_eq!(profiler.state(), HeapSamplingState::Idle);
    assert!(matches!(
        profiler.snapshot(),
        Err(ProfilerError::EngineUnavailable(_))
    ));

    profiler.start_sampling(None);
    assert!(profiler.snapshot().unwrap().children.is_empty());
}

#[test]
fn test_restart_resets_tree() {
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());

    profiler.start_sampling(Some(params(1024, 16)));
    engine.record_allocation(64, &[frame("a")]);
    profiler.start_sampling(Some(params(2048, 2)));

    assert_eq!(engine.active_params(), Some(params(2048, 2)));
    assert!(profiler.snapshot().unwrap().children.is_empty());
}

#[test]
fn test_start_adopts_externally_started_engine() {
    let engine = InMemoryHeapEngine::new();
    let mut handle = engine.clone();
    profiler_core::HeapSamplingEngine::start_sampling(&mut handle, params(4096, 4));

    let mut profiler = HeapProfiler::new(engine.clone());
    profiler.start_sampling(Some(params(1024, 16)));

    assert_eq!(engine.active_params(), Some(params(1024, 16)));
    assert!(profiler.is_sampling());
}

#[test]
fn test_deep_allocation_stack_snapshot() {
    let depth = 100_000;
    let engine = InMemoryHeapEngine::new();
    let mut profiler = HeapProfiler::new(engine.clone());
    profiler.start_sampling(Some(params(1024, depth as i32)));

    let stack: Vec<CallFrame> = (0..depth).map(|line| CallFrame::new("f", "alloc.js", 7, line, 1)).collect();
    engine.record_allocation(32, &stack);

    let tree = profiler.snapshot().unwrap();
    let mut levels = 0;
    let mut node = &tree;
    while let Some(next) = node.children.first() {
        levels += 1;
        node = next;
    }
    assert_eq!(levels, depth as usize);
    assert_eq!(node.allocations[0].size_bytes, 32.0);

    profiler.stop_sampling();
}
