//! Engine tree to output tree translation
//!
//! Both translators walk the engine tree with an explicit work stack, so call
//! depth is bounded by heap memory rather than the thread's stack.

mod allocation;
mod time;

pub use allocation::translate_allocation_tree;
pub use time::{translate_time_tree, TranslationMode};

/// Missing strings become empty
fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Negative counts become zero
fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
