//! Shared test utilities for section-store tests.
//!
//! - Sample documents in each supported format
//! - Temporary config files
//! - Application types that round-trip through a registry

#![allow(dead_code)]

use section_store::{ConfigSerializable, DeserializationError, Section};
use std::path::PathBuf;
use tempfile::TempDir;

/// A web front end's servlet layout, as users write it by hand.
pub const SERVLETS_YAML: &str = r#"
app:
  name: storefront
  port: "8080"
  servlets:
    Home:
      class: com.example.Home
      url-patterns:
        - /
        - /home
    Api:
      class: com.example.Api
      url-patterns: ["/api/*"]
    Broken: 42
"#;

pub const SERVER_TOML: &str = r#"
[server]
host = "127.0.0.1"
port = 8080
tls = false

[server.limits]
max_connections = 512
ratio = 0.75
"#;

pub const SERVER_JSON: &str = r#"{
  "server": {
    "host": "127.0.0.1",
    "port": 8080,
    "paths": ["/", "/static"]
  }
}"#;

/// Write `content` to `name` inside a fresh temporary directory.
///
/// The directory is removed when the returned guard drops.
pub fn write_temp_config(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write temp config");
    (dir, path)
}

/// Network endpoint stored as a tagged section.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub host: String,
    pub port: i64,
}

impl Endpoint {
    pub fn new(host: &str, port: i64) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

impl ConfigSerializable for Endpoint {
    fn canonical_name() -> &'static str {
        "net.Endpoint"
    }

    fn alias() -> Option<&'static str> {
        Some("endpoint")
    }

    fn to_map(&self) -> Section {
        let mut map = Section::new();
        map.insert("host", self.host.as_str());
        map.insert("port", self.port);
        map
    }

    fn from_map(map: &Section) -> Result<Self, DeserializationError> {
        let host = map
            .get_string_opt("host")?
            .ok_or_else(|| DeserializationError::missing_field("host"))?;
        if !map.contains("port")? {
            return Err(DeserializationError::missing_field("port"));
        }
        Ok(Self {
            host,
            port: map.get_int("port", 0)?,
        })
    }
}

/// Retry policy with no alias, written under its canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub attempts: i64,
    pub backoff_ms: i64,
}

impl ConfigSerializable for RetryPolicy {
    fn canonical_name() -> &'static str {
        "net.RetryPolicy"
    }

    fn to_map(&self) -> Section {
        [("attempts", self.attempts), ("backoff-ms", self.backoff_ms)]
            .into_iter()
            .collect()
    }

    fn from_map(map: &Section) -> Result<Self, DeserializationError> {
        Ok(Self {
            attempts: map.get_int("attempts", 3)?,
            backoff_ms: map.get_int("backoff-ms", 100)?,
        })
    }
}
