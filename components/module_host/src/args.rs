//! Positional argument validation
//!
//! Module methods receive their arguments as a JSON array, the way a script
//! host would pass them. These helpers check arity and types before any
//! engine call is made, so a rejected call never has side effects.

use profile_types::ProfilerError;
use serde_json::Value;

/// Check that exactly `expected` arguments were passed
pub fn expect_arity(method: &str, args: &[Value], expected: usize) -> Result<(), ProfilerError> {
    if args.len() != expected {
        return Err(ProfilerError::InvalidArgument(format!(
            "{} must have {} argument{}, got {}",
            method,
            expected,
            if expected == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

/// Extract a string argument
pub fn expect_string<'a>(args: &'a [Value], index: usize) -> Result<&'a str, ProfilerError> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| type_error(index, "a string"))
}

/// Extract a boolean argument
pub fn expect_bool(args: &[Value], index: usize) -> Result<bool, ProfilerError> {
    args.get(index)
        .and_then(Value::as_bool)
        .ok_or_else(|| type_error(index, "a boolean"))
}

/// Extract an unsigned 32-bit integer argument
pub fn expect_u32(args: &[Value], index: usize) -> Result<u32, ProfilerError> {
    args.get(index)
        .and_then(as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| type_error(index, "an unsigned 32-bit integer"))
}

/// Extract a signed 32-bit integer argument
pub fn expect_i32(args: &[Value], index: usize) -> Result<i32, ProfilerError> {
    args.get(index)
        .and_then(as_integer)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| type_error(index, "an integer"))
}

/// Integral JSON numbers, including floats with no fractional part (`16.0`)
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    if value.is_u64() {
        // Larger than i64::MAX; out of range for every caller
        return None;
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn type_error(index: usize, expected: &str) -> ProfilerError {
    ProfilerError::InvalidArgument(format!(
        "{} argument type must be {}",
        ordinal(index),
        expected
    ))
}

fn ordinal(index: usize) -> String {
    match index {
        0 => "First".to_string(),
        1 => "Second".to_string(),
        2 => "Third".to_string(),
        n => format!("Argument {}", n + 1),
    }
}
