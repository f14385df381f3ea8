//! Typed extraction helpers for `serde_json::Value` parameter objects.
//!
//! Missing keys and wrong types fall back to the provided default; these
//! never fail, so parameter plumbing stays infallible.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, falling back to `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`, falling back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, falling back to `default`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}
