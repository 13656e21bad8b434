// Allocation profile types

use serde::{Deserialize, Serialize};

/// Allocations of one size class at a call site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Size of each allocation in bytes
    pub size_bytes: f64,
    /// Number of sampled allocations of this size
    pub count: f64,
}

impl Allocation {
    /// Approximate bytes attributed to this record
    pub fn total_bytes(&self) -> f64 {
        self.size_bytes * self.count
    }
}

/// A call site in a translated allocation profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllocationProfileNode {
    /// Function name
    pub name: String,
    /// Script resource name
    pub script_name: String,
    /// Script identifier
    pub script_id: i64,
    /// Line number of the call site
    pub line_number: i64,
    /// Column number of the call site
    pub column_number: i64,
    /// Callee call sites, in engine order
    pub children: Vec<AllocationProfileNode>,
    /// Allocation records attributed to exactly this call site
    pub allocations: Vec<Allocation>,
}

impl AllocationProfileNode {
    /// Approximate bytes allocated in this subtree
    pub fn total_bytes(&self) -> f64 {
        let mut total = 0.0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            total += node.allocations.iter().map(Allocation::total_bytes).sum::<f64>();
            pending.extend(node.children.iter());
        }
        total
    }

    /// Sampled allocation count in this subtree
    pub fn total_count(&self) -> f64 {
        let mut total = 0.0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            total += node.allocations.iter().map(|a| a.count).sum::<f64>();
            pending.extend(node.children.iter());
        }
        total
    }
}

impl Drop for AllocationProfileNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
