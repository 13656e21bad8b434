//! Unit tests for profiler_core component

mod heap_profiler_tests;
mod module_tests;
