//! Helpers for reading typed parameters out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key or
//! a value of the wrong type yields the default, so a partial parameter object
//! only overrides what it names.

use serde_json::Value;

/// Extracts an `f32` from `params[name]`, returning `default` if missing or wrong type.
///
/// Integers are accepted and converted.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Returns the nested object at `params[name]`, or `Value::Null` when absent.
///
/// Every `param_*` helper treats `Null` as "use the default", so callers can
/// read a missing section without special-casing it.
pub fn param_section<'a>(params: &'a Value, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    match params.get(name) {
        Some(section @ Value::Object(_)) => section,
        _ => &NULL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f32 --

    #[test]
    fn param_f32_extracts_existing_float() {
        let params = json!({"wind_speed": 12.5});
        assert_eq!(param_f32(&params, "wind_speed", 1.0), 12.5);
    }

    #[test]
    fn param_f32_extracts_integer_as_float() {
        let params = json!({"fetch": 100000});
        assert_eq!(param_f32(&params, "fetch", 0.0), 100_000.0);
    }

    #[test]
    fn param_f32_returns_default_when_wrong_type() {
        let params = json!({"depth": "deep"});
        assert_eq!(param_f32(&params, "depth", 500.0), 500.0);
    }

    #[test]
    fn param_f32_returns_default_for_non_object() {
        let params = json!("not an object");
        assert_eq!(param_f32(&params, "g", 9.81), 9.81);
    }

    // -- param_bool --

    #[test]
    fn param_bool_extracts_value_or_default() {
        assert!(param_bool(&json!({"mips": true}), "mips", false));
        assert!(!param_bool(&json!({"mips": 1}), "mips", false));
        assert!(param_bool(&json!({}), "mips", true));
    }

    // -- param_section --

    #[test]
    fn param_section_returns_nested_object() {
        let params = json!({"local": {"wind_speed": 8.0}});
        let local = param_section(&params, "local");
        assert_eq!(param_f32(local, "wind_speed", 0.0), 8.0);
    }

    #[test]
    fn param_section_missing_reads_as_defaults() {
        let params = json!({});
        let swell = param_section(&params, "swell");
        assert!(swell.is_null());
        assert_eq!(param_f32(swell, "fetch", 300_000.0), 300_000.0);
    }

    #[test]
    fn param_section_ignores_non_object_values() {
        let params = json!({"local": 3});
        assert!(param_section(&params, "local").is_null());
    }
}
