//! Dotted path splitting.

use super::error::{PathError, PathResult};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Split a dotted path into its ordered segments.
///
/// Every segment must be non-empty: `""`, `".a"`, `"a."` and `"a..b"` are all
/// rejected. Segments are returned as borrowed slices of `path`.
pub fn split_path(path: &str) -> PathResult<Vec<&str>> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if let Some(index) = segments.iter().position(|s| s.is_empty()) {
        return Err(PathError::empty_segment(path, index));
    }

    Ok(segments)
}

/// Join a parent path and a child key.
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, key)
    }
}
