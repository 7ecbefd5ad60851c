//! Typed accessors with default fallback.
//!
//! Configuration documents are edited by hand, so a value of the wrong shape
//! is treated exactly like a missing one: the caller's default comes back
//! unchanged. The only error these methods return is a malformed path.

use super::error::PathResult;
use super::{Section, Value};

impl Section {
    /// String form of the scalar at `path`, or `default`.
    pub fn get_string(&self, path: &str, default: &str) -> PathResult<String> {
        Ok(self
            .get_string_opt(path)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// String form of the scalar at `path`; `None` when absent or not a scalar.
    pub fn get_string_opt(&self, path: &str) -> PathResult<Option<String>> {
        Ok(self.get(path)?.and_then(Value::scalar_string))
    }

    /// Integer at `path`, or `default`.
    ///
    /// Floats are truncated toward zero; numeric strings are parsed.
    pub fn get_int(&self, path: &str, default: i64) -> PathResult<i64> {
        Ok(self.get(path)?.and_then(coerce_int).unwrap_or(default))
    }

    /// Like [`Section::get_int`], falling back when the value overflows `i32`.
    pub fn get_i32(&self, path: &str, default: i32) -> PathResult<i32> {
        Ok(self
            .get(path)?
            .and_then(coerce_int)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(default))
    }

    /// Floating point number at `path`, or `default`.
    pub fn get_float(&self, path: &str, default: f64) -> PathResult<f64> {
        Ok(self.get(path)?.and_then(coerce_float).unwrap_or(default))
    }

    /// Boolean at `path`; accepts `"true"`/`"false"` in any case.
    pub fn get_boolean(&self, path: &str, default: bool) -> PathResult<bool> {
        Ok(self.get(path)?.and_then(coerce_bool).unwrap_or(default))
    }

    /// List of scalars at `path` as strings, or `default`.
    pub fn get_string_list(&self, path: &str, default: Vec<String>) -> PathResult<Vec<String>> {
        Ok(self.get_string_list_opt(path)?.unwrap_or(default))
    }

    /// List of scalars at `path` as strings.
    ///
    /// `None` means not configured (or not a list of scalars); `Some(vec![])`
    /// means configured empty.
    pub fn get_string_list_opt(&self, path: &str) -> PathResult<Option<Vec<String>>> {
        Ok(self
            .get(path)?
            .and_then(Value::as_list)
            .and_then(|items| items.iter().map(Value::scalar_string).collect()))
    }

    /// Fixed-size form of [`Section::get_string_list`] for positional access.
    pub fn get_string_array(&self, path: &str, default: &[&str]) -> PathResult<Box<[String]>> {
        Ok(match self.get_string_list_opt(path)? {
            Some(items) => items.into_boxed_slice(),
            None => default.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn is_string(&self, path: &str) -> PathResult<bool> {
        Ok(matches!(self.get(path)?, Some(Value::String(_))))
    }

    pub fn is_int(&self, path: &str) -> PathResult<bool> {
        Ok(matches!(self.get(path)?, Some(Value::Int(_))))
    }

    pub fn is_boolean(&self, path: &str) -> PathResult<bool> {
        Ok(matches!(self.get(path)?, Some(Value::Bool(_))))
    }

    pub fn is_list(&self, path: &str) -> PathResult<bool> {
        Ok(matches!(self.get(path)?, Some(Value::List(_))))
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) => float_to_int(*f),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then(|| t as i64)
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
