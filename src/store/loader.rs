//! Config file discovery and environment overrides.

use super::error::StoreResult;
use super::Store;
use crate::section::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Base names probed, in order, in each candidate directory.
const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

/// Separator between path segments inside an environment variable name.
const ENV_SEGMENT_SEPARATOR: &str = "__";

impl Store {
    /// Load configuration for `app_name` using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `<APP>_CONFIG` environment variable (explicit path)
    /// 2. `./config.{toml,yaml,yml,json}` (current directory)
    /// 3. `~/.config/<app>/config.*` (XDG on Linux/macOS)
    /// 4. `%APPDATA%\<app>\config.*` (Windows)
    /// 5. Empty store with no backing file
    ///
    /// Environment variables prefixed with `<APP>_` are applied on top, see
    /// [`Store::apply_env_overrides`].
    pub fn discover(app_name: &str) -> StoreResult<Self> {
        let mut store = match resolve_config_path(app_name) {
            Some(path) => Store::open(&path)?,
            None => {
                debug!("No configuration file found for '{}', using empty store", app_name);
                Store::new()
            }
        };

        store.apply_env_overrides(&env_prefix(app_name));
        Ok(store)
    }

    /// Apply environment variable overrides.
    ///
    /// Every variable named `<PREFIX>_<A>__<B>` sets path `a.b` to its raw
    /// string value: segments are separated by a double underscore and
    /// lower-cased. `<PREFIX>_CONFIG` is reserved for the config file path and
    /// skipped. Returns the number of values applied.
    ///
    /// For example, with prefix `MYAPP`:
    /// - `MYAPP_SERVER__PORT=8080` sets `server.port`
    /// - `MYAPP_LOG_LEVEL=debug` sets `log_level`
    pub fn apply_env_overrides(&mut self, prefix: &str) -> usize {
        let var_prefix = format!("{}_", prefix);
        let reserved = format!("{}_CONFIG", prefix);

        let mut vars: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(name, value)| match (name.to_str(), value.to_str()) {
                (Some(name), Some(value)) => Some((name.to_string(), value.to_string())),
                _ => {
                    debug!("Skipping non-Unicode environment variable {:?}", name);
                    None
                }
            })
            .filter(|(name, _)| name.starts_with(&var_prefix) && *name != reserved)
            .collect();
        vars.sort();

        let mut applied = 0;
        for (name, value) in vars {
            let rest = &name[var_prefix.len()..];
            let segments: Vec<String> = rest
                .split(ENV_SEGMENT_SEPARATOR)
                .map(str::to_lowercase)
                .collect();
            if segments.iter().any(|s| s.is_empty()) {
                warn!("Ignoring environment override '{}': empty path segment", name);
                continue;
            }

            let path = segments.join(".");
            match self.set(&path, Value::String(value)) {
                Ok(()) => {
                    debug!("Applied environment override {} -> {}", name, path);
                    applied += 1;
                }
                Err(e) => warn!("Ignoring environment override '{}': {}", name, e),
            }
        }

        if applied > 0 {
            info!("Applied {} environment override(s) with prefix {}", applied, prefix);
        }
        applied
    }
}

/// Environment variable prefix for an application name: upper-cased, with
/// `-` and `.` replaced by `_`.
pub fn env_prefix(app_name: &str) -> String {
    app_name
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Resolve the configuration file path for `app_name` using standard
/// locations.
pub fn resolve_config_path(app_name: &str) -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(format!("{}_CONFIG", env_prefix(app_name))) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("Configured path {} does not exist", path.display());
    }

    // 2. Current directory
    if let Some(found) = CONFIG_FILE_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    {
        return Some(found);
    }

    // 3. XDG config directory (Linux/macOS) or APPDATA (Windows)
    let app_dir = get_default_config_dir(app_name)?;
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| app_dir.join(name))
        .find(|p| p.exists())
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Get the default config directory for `app_name`.
pub fn get_default_config_dir(app_name: &str) -> Option<PathBuf> {
    get_config_dir().map(|d| d.join(app_name))
}

/// Get the default config file path for creating a new config file.
pub fn get_default_config_path(app_name: &str) -> Option<PathBuf> {
    get_default_config_dir(app_name).map(|d| d.join(CONFIG_FILE_NAMES[0]))
}
