//! core::path
//!
//! Helpers for the slash-separated, repository-relative paths used by
//! tree entries.
//!
//! Tree entry paths never carry a leading slash, while callers of the
//! filesystem usually pass absolute-looking paths (`/docs/README.md`).
//! Everything that reaches the snapshot goes through [`normalize`] first.
//! The root directory is the empty string.

/// Strip leading and trailing slashes.
///
/// ```
/// use forgefs::core::path::normalize;
///
/// assert_eq!(normalize("/docs/README.md"), "docs/README.md");
/// assert_eq!(normalize("docs/"), "docs");
/// assert_eq!(normalize("/"), "");
/// ```
pub fn normalize(path: &str) -> &str {
    path.trim_start_matches('/').trim_end_matches('/')
}

/// Whether a normalized path denotes the root directory.
pub fn is_root(path: &str) -> bool {
    path.is_empty()
}

/// Parent of a normalized path; the root's children have parent `""`.
///
/// ```
/// use forgefs::core::path::parent;
///
/// assert_eq!(parent("a/b/c"), "a/b");
/// assert_eq!(parent("a"), "");
/// assert_eq!(parent(""), "");
/// ```
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Final component of a normalized path.
pub fn base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Proper ancestors of a normalized path, root-to-leaf, excluding the
/// root and the path itself.
///
/// ```
/// use forgefs::core::path::ancestors;
///
/// assert_eq!(ancestors("a/b/c"), vec!["a", "a/b"]);
/// assert!(ancestors("a").is_empty());
/// ```
pub fn ancestors(path: &str) -> Vec<&str> {
    path.match_indices('/')
        .map(|(idx, _)| &path[..idx])
        .filter(|prefix| !prefix.is_empty())
        .collect()
}

/// Whether `path` lies strictly below directory `dir`.
pub fn is_descendant(path: &str, dir: &str) -> bool {
    if is_root(dir) {
        return !path.is_empty();
    }
    path.len() > dir.len() + 1 && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}
