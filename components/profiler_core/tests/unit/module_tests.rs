//! Unit tests for the timeProfiler and heapProfiler modules

use module_host::ModuleHandler;
use profiler_core::{
    CallFrame, HeapProfilerModule, InMemoryCpuEngine, InMemoryHeapEngine, SamplingParams,
    TimeProfilerModule,
};
use serde_json::{json, Value};

#[tokio::test]
async fn test_start_profiling_requires_two_arguments() {
    let module = TimeProfilerModule::new(InMemoryCpuEngine::new());

    let err = module
        .handle_method("startProfiling", vec![json!("run1")])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);
    assert_eq!(
        err.data.unwrap()["details"],
        "startProfiling must have 2 arguments, got 1"
    );
}

#[tokio::test]
async fn test_start_profiling_rejects_non_string_name() {
    let engine = InMemoryCpuEngine::new();
    let module = TimeProfilerModule::new(engine.clone());

    let err = module
        .handle_method("startProfiling", vec![json!(5), json!(true)])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);
    assert_eq!(
        err.data.unwrap()["details"],
        "First argument type must be a string"
    );
    assert!(engine.running_titles().is_empty());
}

#[tokio::test]
async fn test_stop_profiling_rejects_non_boolean_flag() {
    let module = TimeProfilerModule::new(InMemoryCpuEngine::new());

    let err = module
        .handle_method("stopProfiling", vec![json!("run1"), json!(1)])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn test_stop_profiling_serializes_profile() {
    let engine = InMemoryCpuEngine::new();
    let module = TimeProfilerModule::new(engine.clone());

    module
        .handle_method("startProfiling", vec![json!("run1"), json!(true)])
        .await
        .unwrap();
    engine.record_sample(&[], 10);
    engine.record_sample(&[CallFrame::new("work", "w.js", 2, 5, 1)], 6);

    let profile = module
        .handle_method("stopProfiling", vec![json!("run1"), json!(true)])
        .await
        .unwrap();

    let root = &profile["topDownRoot"];
    assert_eq!(root["hitCount"], 1);
    assert_eq!(root["children"][0]["lineNumber"], 10);
    assert_eq!(root["children"][1]["functionName"], "work");
    assert_eq!(root["children"][1]["scriptName"], "w.js");
    assert!(profile["startTime"].is_number());
    assert!(profile["endTime"].is_number());
}

#[tokio::test]
async fn test_stop_unknown_returns_null_root() {
    let module = TimeProfilerModule::new(InMemoryCpuEngine::new());

    let profile = module
        .handle_method("stopProfiling", vec![json!("never-started"), json!(false)])
        .await
        .unwrap();
    assert_eq!(profile["title"], "never-started");
    assert_eq!(profile["topDownRoot"], Value::Null);
}

#[tokio::test]
async fn test_set_sampling_interval_validates_range() {
    let engine = InMemoryCpuEngine::new();
    let module = TimeProfilerModule::new(engine.clone());

    let err = module
        .handle_method("setSamplingInterval", vec![json!(-1)])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);

    module
        .handle_method("setSamplingInterval", vec![json!(250)])
        .await
        .unwrap();
    assert_eq!(engine.sampling_interval(), 250);
    assert_eq!(module.with_profiler(|p| p.sampling_interval()), Some(250));
}

#[tokio::test]
async fn test_unknown_time_method() {
    let module = TimeProfilerModule::new(InMemoryCpuEngine::new());

    let err = module.handle_method("takeHeapSnapshot", vec![]).await.unwrap_err();
    assert_eq!(err.code, -32601);
    assert_eq!(err.data.unwrap()["method"], "timeProfiler.takeHeapSnapshot");
}

#[tokio::test]
async fn test_heap_zero_argument_start_uses_defaults() {
    let defaults = SamplingParams {
        sample_interval_bytes: 8192,
        stack_depth: 32,
    };
    let engine = InMemoryHeapEngine::with_defaults(defaults);
    let module = HeapProfilerModule::new(engine.clone());

    module
        .handle_method("startSamplingHeapProfiler", vec![])
        .await
        .unwrap();
    assert_eq!(engine.active_params(), Some(defaults));
}

#[tokio::test]
async fn test_heap_start_rejects_wrong_types() {
    let engine = InMemoryHeapEngine::new();
    let module = HeapProfilerModule::new(engine.clone());

    for args in [
        vec![json!("1024"), json!(16)],
        vec![json!(1024), json!("16")],
        vec![json!(-1), json!(16)],
        vec![json!(1024), json!(16), json!(0)],
    ] {
        let err = module
            .handle_method("startSamplingHeapProfiler", args)
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }
    assert!(engine.active_params().is_none());
}

#[tokio::test]
async fn test_heap_stop_and_profile_take_no_arguments() {
    let module = HeapProfilerModule::new(InMemoryHeapEngine::new());

    let err = module
        .handle_method("stopSamplingHeapProfiler", vec![json!(1)])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);

    let err = module
        .handle_method("getAllocationProfile", vec![json!(1)])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn test_heap_profile_when_idle_is_engine_unavailable() {
    let module = HeapProfilerModule::new(InMemoryHeapEngine::new());

    let err = module
        .handle_method("getAllocationProfile", vec![])
        .await
        .unwrap_err();
    assert_eq!(err.code, -32003);
}

#[tokio::test]
async fn test_heap_profile_serializes_allocations() {
    let engine = InMemoryHeapEngine::new();
    let module = HeapProfilerModule::new(engine.clone());

    module
        .handle_method("startSamplingHeapProfiler", vec![json!(1024), json!(16)])
        .await
        .unwrap();
    engine.record_allocation(96, &[CallFrame::new("build", "b.js", 4, 10, 3)]);

    let root = module
        .handle_method("getAllocationProfile", vec![])
        .await
        .unwrap();
    let site = &root["children"][0];
    assert_eq!(site["name"], "build");
    assert_eq!(site["scriptName"], "b.js");
    assert_eq!(site["allocations"][0]["sizeBytes"], 96.0);
    assert_eq!(site["allocations"][0]["count"], 1.0);

    // Sampling is still active after a snapshot
    assert!(module.with_profiler(|p| p.is_sampling()));
}
