//! Virtual-path handling shared by the media endpoints
//!
//! Virtual paths are expressed relative to the federated root and are
//! share-agnostic; each share resolves them under its own configured
//! root.

/// Normalize a caller-supplied virtual path: leading slash, no empty
/// or `.` segments. Returns `None` when the path tries to climb out
/// of the root.
pub(crate) fn normalize_virtual(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        Some("/".to_string())
    } else {
        Some(format!("/{}", segments.join("/")))
    }
}

/// Path of `virtual_path` inside a share rooted at `root`
pub(crate) fn share_path(root: &str, virtual_path: &str) -> String {
    let root = root.trim_end_matches('/');
    let rel = virtual_path.trim_start_matches('/');
    match (root.is_empty(), rel.is_empty()) {
        (true, true) => "/".to_string(),
        (false, true) => root.to_string(),
        (true, false) => format!("/{}", rel),
        (false, false) => format!("{}/{}", root, rel),
    }
}

/// Federated path of a child entry listed under `virtual_path`
pub(crate) fn virtual_child(virtual_path: &str, name: &str) -> String {
    format!("{}/{}", virtual_path.trim_end_matches('/'), name)
}

/// Final component of a virtual path
pub(crate) fn file_name(virtual_path: &str) -> &str {
    virtual_path.rsplit('/').next().unwrap_or(virtual_path)
}

/// Filename without its extension
pub(crate) fn title(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
