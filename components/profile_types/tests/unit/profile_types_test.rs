// Unit tests for the output profile trees

use profile_types::{Allocation, AllocationProfileNode, TimeProfile, TimeProfileNode};
use serde_json::json;

fn frame(name: &str, line: i64, hits: u64, children: Vec<TimeProfileNode>) -> TimeProfileNode {
    TimeProfileNode {
        function_name: name.to_string(),
        script_name: "file:///srv/app.js".to_string(),
        script_id: 12,
        line_number: line,
        column_number: 4,
        hit_count: hits,
        children,
    }
}

#[test]
fn test_time_profile_shape() {
    let profile = TimeProfile {
        title: "run1".to_string(),
        top_down_root: Some(frame(
            "(root)",
            0,
            0,
            vec![frame("main", 10, 3, vec![frame("parse", 40, 1, vec![])])],
        )),
        start_time: 1000.0,
        end_time: 2500.0,
    };

    let value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["title"], "run1");
    assert_eq!(value["startTime"], 1000.0);
    assert_eq!(value["endTime"], 2500.0);
    assert_eq!(value["topDownRoot"]["children"][0]["functionName"], "main");
    assert_eq!(
        value["topDownRoot"]["children"][0]["children"][0]["lineNumber"],
        40
    );
    assert_eq!(profile.duration(), 1500.0);
}

#[test]
fn test_time_profile_deserialization() {
    let value = json!({
        "title": "t",
        "topDownRoot": {
            "functionName": "(root)",
            "scriptName": "",
            "scriptId": 0,
            "lineNumber": 0,
            "columnNumber": 0,
            "hitCount": 0,
            "children": []
        },
        "startTime": 1.0,
        "endTime": 2.0
    });

    let profile: TimeProfile = serde_json::from_value(value).unwrap();
    let root = profile.top_down_root.unwrap();
    assert_eq!(root.function_name, "(root)");
    assert!(root.children.is_empty());
}

#[test]
fn test_allocation_node_shape() {
    let node = AllocationProfileNode {
        name: "(root)".to_string(),
        script_name: String::new(),
        script_id: 0,
        line_number: 0,
        column_number: 0,
        children: vec![AllocationProfileNode {
            name: "makeBuffer".to_string(),
            script_name: "buf.js".to_string(),
            script_id: 2,
            line_number: 7,
            column_number: 12,
            children: vec![],
            allocations: vec![
                Allocation {
                    size_bytes: 100.0,
                    count: 3.0,
                },
                Allocation {
                    size_bytes: 100.0,
                    count: 3.0,
                },
            ],
        }],
        allocations: vec![],
    };

    let value = serde_json::to_value(&node).unwrap();
    let child = &value["children"][0];
    assert_eq!(child["name"], "makeBuffer");
    assert_eq!(child["scriptName"], "buf.js");
    assert_eq!(child["allocations"].as_array().unwrap().len(), 2);
    assert_eq!(child["allocations"][1]["sizeBytes"], 100.0);
    assert_eq!(node.total_bytes(), 600.0);
}
