//! Nested, path-addressed configuration sections.
//!
//! A [`Section`] owns an ordered mapping from key to [`Value`]. Values may
//! themselves be sections, which makes the root section the whole tree.
//! Every path-taking method accepts a dotted path such as
//! `"app.servlets.Home.class"`; see [`split_path`] for the rules.
//!
//! # Addressing
//!
//! - Reads never fail on document shape: a missing segment, or a segment that
//!   holds a scalar where a section was expected, reads as absent.
//! - Writes create missing sections on the way down and replace any non-section
//!   value standing in the way with a fresh empty section.
//! - Only a malformed path (`""`, `"a..b"`) produces an error.
//!
//! # Example
//!
//! ```rust
//! use section_store::Section;
//!
//! let mut root = Section::new();
//! root.set("server.http.port", 8080).unwrap();
//!
//! assert!(root.contains_section("server.http").unwrap());
//! assert_eq!(root.get_int("server.http.port", 80).unwrap(), 8080);
//! assert_eq!(root.get_int("server.https.port", 443).unwrap(), 443);
//! ```

mod accessors;
mod error;
mod path;
mod value;

pub use error::{PathError, PathResult};
pub use path::{join_path, split_path, PATH_SEPARATOR};
pub use value::Value;

use indexmap::IndexMap;
use serde_json::{Map, Value as J};
use tracing::debug;

/// A mutable node of the configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    entries: IndexMap<String, Value>,
}

impl Section {
    /// Create an empty section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over direct children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Direct child values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Keys of this section.
    ///
    /// With `deep`, every descendant is listed as a dotted path relative to
    /// this section, parents before their children.
    pub fn keys(&self, deep: bool) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_keys("", deep, &mut out);
        out
    }

    fn collect_keys(&self, prefix: &str, deep: bool, out: &mut Vec<String>) {
        for (key, value) in &self.entries {
            let full = join_path(prefix, key);
            if deep {
                if let Value::Section(child) = value {
                    out.push(full.clone());
                    child.collect_keys(&full, deep, out);
                    continue;
                }
            }
            out.push(full);
        }
    }

    /// Insert a direct child without path parsing.
    ///
    /// The key is taken verbatim, so it may contain the path separator.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a direct child without path parsing.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Remove a direct child without path parsing, keeping sibling order.
    pub fn remove_key(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Read the value at `path`.
    pub fn get(&self, path: &str) -> PathResult<Option<&Value>> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };

        let mut current = self;
        for segment in parents {
            match current.entries.get(*segment) {
                Some(Value::Section(child)) => current = child,
                _ => return Ok(None),
            }
        }
        Ok(current.entries.get(*last))
    }

    /// Mutable access to the value at `path`, without creating anything.
    pub fn get_mut(&mut self, path: &str) -> PathResult<Option<&mut Value>> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };

        let mut current = self;
        for segment in parents {
            match current.entries.get_mut(*segment) {
                Some(Value::Section(child)) => current = child,
                _ => return Ok(None),
            }
        }
        Ok(current.entries.get_mut(*last))
    }

    /// Write `value` at `path`, creating intermediate sections as needed.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> PathResult<()> {
        let segments = split_path(path)?;
        if let Some((last, parents)) = segments.split_last() {
            self.vivify(parents)
                .entries
                .insert((*last).to_string(), value.into());
        }
        Ok(())
    }

    /// Return the section at `path`, creating every missing segment.
    pub fn resolve(&mut self, path: &str) -> PathResult<&mut Section> {
        let segments = split_path(path)?;
        Ok(self.vivify(&segments))
    }

    /// Replace whatever is at `path` with a fresh empty section.
    pub fn create_section(&mut self, path: &str) -> PathResult<&mut Section> {
        self.set(path, Section::new())?;
        self.resolve(path)
    }

    /// The section at `path`, if the terminal value is one.
    pub fn get_section(&self, path: &str) -> PathResult<Option<&Section>> {
        Ok(self.get(path)?.and_then(Value::as_section))
    }

    pub fn get_section_mut(&mut self, path: &str) -> PathResult<Option<&mut Section>> {
        Ok(self.get_mut(path)?.and_then(Value::as_section_mut))
    }

    /// True when any value, including null, is stored at `path`.
    pub fn contains(&self, path: &str) -> PathResult<bool> {
        Ok(self.get(path)?.is_some())
    }

    /// True only when the value at `path` exists and is a section.
    pub fn contains_section(&self, path: &str) -> PathResult<bool> {
        Ok(self.get_section(path)?.is_some())
    }

    /// Remove and return the value at `path`.
    pub fn remove(&mut self, path: &str) -> PathResult<Option<Value>> {
        let segments = split_path(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };

        let mut current = self;
        for segment in parents {
            match current.entries.get_mut(*segment) {
                Some(Value::Section(child)) => current = child,
                _ => return Ok(None),
            }
        }
        Ok(current.entries.shift_remove(*last))
    }

    /// Copy every key missing from `self` out of `defaults`.
    ///
    /// Sections present on both sides are merged recursively; any other value
    /// already present in `self` wins.
    pub fn merge_defaults(&mut self, defaults: &Section) {
        for (key, fallback) in &defaults.entries {
            match self.entries.get_mut(key) {
                None => {
                    self.entries.insert(key.clone(), fallback.clone());
                }
                Some(Value::Section(mine)) => {
                    if let Value::Section(theirs) = fallback {
                        mine.merge_defaults(theirs);
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Build a section from a generic codec mapping.
    pub fn from_json_map(map: Map<String, J>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, Value::from_json(v)))
                .collect(),
        }
    }

    /// Walk the section back into a generic codec mapping.
    pub fn to_json_map(&self) -> Map<String, J> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }

    fn vivify(&mut self, segments: &[&str]) -> &mut Section {
        let mut current = self;
        for segment in segments {
            let slot = current
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Section(Section::new()));
            current = section_in(slot, segment);
        }
        current
    }
}

/// Borrow the section held by `slot`, replacing any other value with an
/// empty section first.
fn section_in<'a>(slot: &'a mut Value, key: &str) -> &'a mut Section {
    match slot {
        Value::Section(child) => child,
        other => {
            debug!("Replacing {} at '{}' with a section", other.kind(), key);
            *other = Value::Section(Section::new());
            section_in(other, key)
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Section {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
