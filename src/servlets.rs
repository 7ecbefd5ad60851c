//! Servlet bindings read from a configuration sub-tree.
//!
//! Web front ends describe their handlers as one child section per servlet:
//!
//! ```yaml
//! applications:
//!   Home:
//!     class: com.example.Home
//!     url-patterns: ["/", "/home"]
//! ```
//!
//! This module only reads that layout through the typed accessors; routing
//! and dispatch live elsewhere.

use crate::section::{join_path, PathResult, Section};
use crate::serialization::{ConfigSerializable, DeserializationError};
use serde::Serialize;
use tracing::warn;

/// Path read by [`servlet_bindings`] callers that have no layout of their own.
pub const DEFAULT_SERVLETS_PATH: &str = "applications";

/// Key holding the handler class name.
pub const CLASS_KEY: &str = "class";

/// Key holding the list of URL patterns.
pub const URL_PATTERNS_KEY: &str = "url-patterns";

/// One servlet entry: a handler class and the URL patterns it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServletBinding {
    pub name: String,
    pub class: String,
    pub url_patterns: Box<[String]>,
}

/// Read every servlet defined under `path`.
///
/// Children that are not sections, or that have no `class`, are skipped with a
/// warning. A missing `url-patterns` list yields no patterns.
pub fn servlet_bindings(root: &Section, path: &str) -> PathResult<Vec<ServletBinding>> {
    let Some(servlets) = root.get_section(path)? else {
        return Ok(Vec::new());
    };

    let mut bindings = Vec::with_capacity(servlets.len());
    for (name, value) in servlets.iter() {
        let Some(entry) = value.as_section() else {
            warn!("Skipping servlet '{}': not a section", join_path(path, name));
            continue;
        };
        let Some(class) = entry.get_string_opt(CLASS_KEY)? else {
            warn!("Skipping servlet '{}': no {}", join_path(path, name), CLASS_KEY);
            continue;
        };

        bindings.push(ServletBinding {
            name: name.to_string(),
            class,
            url_patterns: entry.get_string_array(URL_PATTERNS_KEY, &[])?,
        });
    }
    Ok(bindings)
}

impl ConfigSerializable for ServletBinding {
    fn alias() -> Option<&'static str> {
        Some("servlet")
    }

    fn to_map(&self) -> Section {
        let mut map = Section::new();
        map.insert("name", self.name.as_str());
        map.insert(CLASS_KEY, self.class.as_str());
        map.insert(URL_PATTERNS_KEY, self.url_patterns.to_vec());
        map
    }

    fn from_map(map: &Section) -> Result<Self, DeserializationError> {
        let name = map
            .get_string_opt("name")?
            .ok_or_else(|| DeserializationError::missing_field("name"))?;
        let class = map
            .get_string_opt(CLASS_KEY)?
            .ok_or_else(|| DeserializationError::missing_field(CLASS_KEY))?;
        let url_patterns = map
            .get_string_list_opt(URL_PATTERNS_KEY)?
            .ok_or_else(|| DeserializationError::invalid_field(URL_PATTERNS_KEY, "a list"))?
            .into_boxed_slice();

        Ok(Self {
            name,
            class,
            url_patterns,
        })
    }
}
