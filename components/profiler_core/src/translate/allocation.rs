//! Allocation tree translation

use profile_types::{Allocation, AllocationProfileNode};

use super::text;
use crate::engine::AllocationNode;

struct Pending<'a, N> {
    node: &'a N,
    next_child: usize,
    out: AllocationProfileNode,
}

impl<'a, N: AllocationNode> Pending<'a, N> {
    fn enter(node: &'a N) -> Self {
        // 1:1 with engine records; equal size classes are not merged
        let allocations = node
            .allocations()
            .iter()
            .map(|record| Allocation {
                size_bytes: record.size as f64,
                count: record.count as f64,
            })
            .collect();

        Self {
            node,
            next_child: 0,
            out: AllocationProfileNode {
                name: text(node.name()),
                script_name: text(node.script_name()),
                script_id: node.script_id(),
                line_number: node.line_number(),
                column_number: node.column_number(),
                children: Vec::with_capacity(node.child_count()),
                allocations,
            },
        }
    }
}

/// Translate an engine allocation tree into an [`AllocationProfileNode`] tree
pub fn translate_allocation_tree<N: AllocationNode>(root: &N) -> AllocationProfileNode {
    let mut stack = vec![Pending::enter(root)];
    let mut translated = None;

    while let Some(top) = stack.last_mut() {
        let node = top.node;
        if top.next_child < node.child_count() {
            let index = top.next_child;
            top.next_child += 1;
            if let Some(child) = node.child(index) {
                stack.push(Pending::enter(child));
            }
            continue;
        }

        if let Some(done) = stack.pop() {
            match stack.last_mut() {
                Some(parent) => parent.out.children.push(done.out),
                None => translated = Some(done.out),
            }
        }
    }

    translated.unwrap_or_default()
}
