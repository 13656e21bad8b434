//! Call tree translation

use profile_types::TimeProfileNode;

use super::{non_negative, text};
use crate::engine::CallTreeNode;

/// How a call tree is translated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationMode {
    /// One output node per engine node
    Plain,
    /// Engine nodes additionally get one synthetic leaf per line tick
    LineExpanded,
}

impl TranslationMode {
    /// Pick the mode for a stop request
    ///
    /// Line expansion is only possible when the engine supports it; otherwise
    /// the request silently degrades to `Plain`.
    pub fn select(include_line_info: bool, engine_supports_line_info: bool) -> Self {
        if include_line_info && engine_supports_line_info {
            TranslationMode::LineExpanded
        } else {
            TranslationMode::Plain
        }
    }
}

/// Identity stamped onto synthetic line leaves
///
/// Leaves are labelled with the caller of the node that owns the ticks. The
/// root has no caller and labels its leaves with its own identity.
struct LineOwner {
    function_name: String,
    script_name: String,
    script_id: i64,
}

impl LineOwner {
    fn of(node: &TimeProfileNode) -> Self {
        Self {
            function_name: node.function_name.clone(),
            script_name: node.script_name.clone(),
            script_id: node.script_id,
        }
    }
}

/// A node whose children are still being translated
struct Pending<'a, N> {
    node: &'a N,
    next_child: usize,
    out: TimeProfileNode,
}

impl<'a, N: CallTreeNode> Pending<'a, N> {
    fn enter(node: &'a N, mode: TranslationMode, parent: Option<LineOwner>) -> Self {
        let mut out = TimeProfileNode {
            function_name: text(node.function_name()),
            script_name: text(node.script_name()),
            script_id: node.script_id(),
            line_number: node.line_number(),
            column_number: node.column_number(),
            hit_count: non_negative(node.hit_count()),
            children: Vec::with_capacity(node.child_count()),
        };

        if mode == TranslationMode::LineExpanded {
            if let Some(ticks) = node.line_ticks() {
                let owner = parent.unwrap_or_else(|| LineOwner::of(&out));

                out.hit_count = ticks
                    .iter()
                    .fold(0u64, |sum, t| sum.saturating_add(non_negative(t.hit_count)));
                out.children.reserve(ticks.len());
                for tick in ticks {
                    out.children.push(TimeProfileNode {
                        function_name: owner.function_name.clone(),
                        script_name: owner.script_name.clone(),
                        script_id: owner.script_id,
                        line_number: tick.line,
                        column_number: 0,
                        hit_count: non_negative(tick.hit_count),
                        children: Vec::new(),
                    });
                }
            }
        }

        Self {
            node,
            next_child: 0,
            out,
        }
    }
}

/// Translate an engine call tree into a [`TimeProfileNode`] tree
///
/// Child order is the engine's order. In [`TranslationMode::LineExpanded`],
/// each node's line ticks become leaf children placed before its callees,
/// labelled with the calling node's name, script and id. The node's own
/// `hit_count` becomes the sum of those ticks.
pub fn translate_time_tree<N: CallTreeNode>(root: &N, mode: TranslationMode) -> TimeProfileNode {
    let mut stack = vec![Pending::enter(root, mode, None)];
    let mut translated = None;

    while let Some(top) = stack.last_mut() {
        let node = top.node;
        if top.next_child < node.child_count() {
            let index = top.next_child;
            top.next_child += 1;
            if let Some(child) = node.child(index) {
                let parent =
                    (mode == TranslationMode::LineExpanded).then(|| LineOwner::of(&top.out));
                stack.push(Pending::enter(child, mode, parent));
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
