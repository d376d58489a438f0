/*
 * path.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Path resolution for templates and references.
//!
//! Paths are plain `/`-separated strings rather than `std::path::Path`
//! values: they name entries for whatever [`crate::Loader`] is in use, which
//! need not be a filesystem.

/// Resolve `path` against the file (or directory, with a trailing `/`) named
/// by `base_path`.
///
/// - a leading `/` makes `path` absolute and it passes through unchanged
/// - otherwise `path` is joined to the directory part of `base_path`, the
///   text before its last `/`
/// - `.` segments are dropped and `..` removes the preceding segment
///
/// # Examples
///
/// ```
/// use dok_loader::resolve_path;
///
/// assert_eq!(resolve_path("foo.json", "path/"), "path/foo.json");
/// assert_eq!(resolve_path("foo.json", "path/main.json"), "path/foo.json");
/// assert_eq!(resolve_path("../shared/a.json", "ui/menus/main.json"), "ui/shared/a.json");
/// assert_eq!(resolve_path("/abs/foo.json", "path/"), "/abs/foo.json");
/// ```
pub fn resolve_path(path: &str, base_path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let dir = match base_path.rfind('/') {
        Some(pos) => &base_path[..pos],
        None => "",
    };
    if dir.is_empty() && !base_path.starts_with('/') {
        return normalize(path);
    }
    normalize(&format!("{}/{}", dir, path))
}

/// The extension of the final path segment, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) => Some(&name[pos + 1..]),
    }
}

/// Append `suffix` unless the path already ends with it.
pub fn with_suffix(path: &str, suffix: &str) -> String {
    if suffix.is_empty() || path.ends_with(suffix) {
        path.to_string()
    } else {
        format!("{}{}", path, suffix)
    }
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}
