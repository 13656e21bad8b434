//! Error Response Tests
//!
//! Tests that malformed envelopes and failing calls produce well-formed error
//! replies.

use pprof_bindings::{ProfilerComponent, ProfilerConfig};
use serde_json::{json, Value};

async fn reply_for(message: &str) -> Value {
    let profiler = ProfilerComponent::with_in_memory_engines(ProfilerConfig::default()).unwrap();
    let reply = profiler.handle_message(message).await;
    serde_json::from_str(&reply).unwrap()
}

// ============================================================================
// Envelope Error Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let reply = reply_for("{not json").await;

    assert_eq!(reply["id"], 0);
    assert_eq!(reply["error"]["code"], -32700);
    assert!(reply.get("result").is_none());
}

#[tokio::test]
async fn test_missing_method_is_invalid_request() {
    let reply = reply_for(r#"{"id": 3}"#).await;
    assert_eq!(reply["error"]["code"], -32600);
}

#[tokio::test]
async fn test_method_without_module_is_invalid_request() {
    let reply = reply_for(r#"{"id": 4, "method": "startProfiling"}"#).await;

    assert_eq!(reply["id"], 4);
    assert_eq!(reply["error"]["code"], -32600);
}

#[tokio::test]
async fn test_args_must_be_an_array() {
    let reply = reply_for(r#"{"id": 5, "method": "timeProfiler.startProfiling", "args": {"name": "x"}}"#).await;
    assert_eq!(reply["error"]["code"], -32600);
}

// ============================================================================
// Method Error Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_module() {
    let reply = reply_for(r#"{"id": 6, "method": "Profiler.start"}"#).await;

    assert_eq!(reply["id"], 6);
    assert_eq!(reply["error"]["code"], -32601);
    assert_eq!(reply["error"]["message"], "Method not found");
}

#[tokio::test]
async fn test_unknown_method_on_each_module() {
    for method in ["timeProfiler.unknownMethod", "heapProfiler.unknownMethod"] {
        let message = json!({"id": 7, "method": method}).to_string();
        let reply = reply_for(&message).await;

        assert_eq!(reply["error"]["code"], -32601);
        assert_eq!(reply["error"]["data"]["method"], method);
    }
}

#[tokio::test]
async fn test_engine_unavailable_code() {
    let reply = reply_for(r#"{"id": 8, "method": "heapProfiler.getAllocationProfile"}"#).await;

    assert_eq!(reply["id"], 8);
    assert_eq!(reply["error"]["code"], -32003);
    assert!(reply["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Sampling engine unavailable"));
}

#[tokio::test]
async fn test_success_reply_has_no_error_field() {
    let reply = reply_for(r#"{"id": 9, "method": "timeProfiler.setSamplingInterval", "args": [100]}"#).await;

    assert_eq!(reply["id"], 9);
    assert!(reply.get("error").is_none());
    assert_eq!(reply["result"], Value::Null);
}
