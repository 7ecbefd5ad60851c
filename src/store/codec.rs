//! Text codecs: raw document text <-> generic tree.
//!
//! The store only ever sees the generic tree (`serde_json::Value`), so any
//! syntax that maps onto scalars, sequences and mappings can back a store.

use super::error::CodecError;
use serde_json::{Map, Value as J};
use std::path::Path;

/// Conversion between document text and the generic tree.
#[cfg_attr(test, mockall::automock)]
pub trait TextCodec: Send + Sync {
    /// Human readable format name used in errors and logs.
    fn name(&self) -> &'static str;

    fn parse(&self, text: &str) -> Result<J, CodecError>;

    fn render(&self, tree: &J) -> Result<String, CodecError>;
}

/// TOML documents via the `toml` crate.
///
/// TOML has no null, so null values are dropped on render. Datetimes are read
/// back as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl TextCodec for TomlCodec {
    fn name(&self) -> &'static str {
        "TOML"
    }

    fn parse(&self, text: &str) -> Result<J, CodecError> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| CodecError::parse(self.name(), e))?;
        Ok(toml_to_json(toml::Value::Table(table)))
    }

    fn render(&self, tree: &J) -> Result<String, CodecError> {
        match json_to_toml(tree) {
            Some(toml::Value::Table(table)) => {
                toml::to_string_pretty(&table).map_err(|e| CodecError::render(self.name(), e))
            }
            None => Ok(String::new()),
            Some(_) => Err(CodecError::NotAMapping {
                format: self.name(),
                found: json_kind(tree),
            }),
        }
    }
}

fn toml_to_json(value: toml::Value) -> J {
    match value {
        toml::Value::String(s) => J::String(s),
        toml::Value::Integer(i) => J::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(J::Number)
            .unwrap_or(J::Null),
        toml::Value::Boolean(b) => J::Bool(b),
        toml::Value::Datetime(dt) => J::String(dt.to_string()),
        toml::Value::Array(items) => J::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => J::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn json_to_toml(value: &J) -> Option<toml::Value> {
    match value {
        J::Null => None,
        J::Bool(b) => Some(toml::Value::Boolean(*b)),
        J::Number(n) => match n.as_i64() {
            Some(i) => Some(toml::Value::Integer(i)),
            None => n.as_f64().map(toml::Value::Float),
        },
        J::String(s) => Some(toml::Value::String(s.clone())),
        J::Array(items) => Some(toml::Value::Array(
            items.iter().filter_map(json_to_toml).collect(),
        )),
        J::Object(map) => Some(toml::Value::Table(
            map.iter()
                .filter_map(|(k, v)| json_to_toml(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
    }
}

/// JSON documents via `serde_json`, rendered pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl TextCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, text: &str) -> Result<J, CodecError> {
        if text.trim().is_empty() {
            return Ok(J::Object(Map::new()));
        }
        serde_json::from_str(text).map_err(|e| CodecError::parse(self.name(), e))
    }

    fn render(&self, tree: &J) -> Result<String, CodecError> {
        let mut out =
            serde_json::to_string_pretty(tree).map_err(|e| CodecError::render(self.name(), e))?;
        out.push('\n');
        Ok(out)
    }
}

/// YAML documents via `serde_yaml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl TextCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "YAML"
    }

    fn parse(&self, text: &str) -> Result<J, CodecError> {
        if text.trim().is_empty() {
            return Ok(J::Object(Map::new()));
        }
        serde_yaml::from_str(text).map_err(|e| CodecError::parse(self.name(), e))
    }

    fn render(&self, tree: &J) -> Result<String, CodecError> {
        serde_yaml::to_string(tree).map_err(|e| CodecError::render(self.name(), e))
    }
}

/// Pick a codec from a file extension; anything unrecognised is TOML.
pub fn codec_for_path(path: &Path) -> Box<dyn TextCodec> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => Box::new(JsonCodec),
        Some("yaml") | Some("yml") => Box::new(YamlCodec),
        _ => Box::new(TomlCodec),
    }
}

/// Look up a codec by format name (`toml`, `json`, `yaml`/`yml`).
pub fn codec_by_name(name: &str) -> Option<Box<dyn TextCodec>> {
    match name.to_ascii_lowercase().as_str() {
        "toml" => Some(Box::new(TomlCodec)),
        "json" => Some(Box::new(JsonCodec)),
        "yaml" | "yml" => Some(Box::new(YamlCodec)),
        _ => None,
    }
}

pub(crate) fn json_kind(value: &J) -> &'static str {
    match value {
        J::Null => "null",
        J::Bool(_) => "boolean",
        J::Number(_) => "number",
        J::String(_) => "string",
        J::Array(_) => "list",
        J::Object(_) => "mapping",
    }
}
