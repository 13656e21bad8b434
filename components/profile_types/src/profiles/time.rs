// Time profile types

use serde::{Deserialize, Serialize};

/// A call frame in a translated time profile
///
/// In line-expanded profiles a node's children may also include synthetic
/// per-line leaves, which always precede the real callee frames.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimeProfileNode {
    /// Function name (empty for anonymous functions)
    pub function_name: String,
    /// Script resource name
    pub script_name: String,
    /// Script identifier
    pub script_id: i64,
    /// Line number of the frame (or of the source line, for synthetic nodes)
    pub line_number: i64,
    /// Column number (0 for synthetic line nodes)
    pub column_number: i64,
    /// Samples attributed to this frame or line
    pub hit_count: u64,
    /// Callees and synthetic line leaves, in engine order
    pub children: Vec<TimeProfileNode>,
}

impl TimeProfileNode {
    /// Total number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    /// Sum of hit counts over this subtree
    pub fn total_hits(&self) -> u64 {
        let mut total = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            total = node.hit_count.saturating_add(total);
            pending.extend(node.children.iter());
        }
        total
    }
}

impl Drop for TimeProfileNode {
    // Deep call chains would otherwise recurse once per level
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A finished CPU time profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeProfile {
    /// Name the session was started with
    pub title: String,
    /// Root of the top-down call tree; null when no session ran under `title`
    pub top_down_root: Option<TimeProfileNode>,
    /// Session start (microseconds)
    pub start_time: f64,
    /// Session end (microseconds)
    pub end_time: f64,
}

impl TimeProfile {
    /// A well-formed profile for a name that was never started
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            top_down_root: None,
            start_time: 0.0,
            end_time: 0.0,
        }
    }

    /// Session duration in microseconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
