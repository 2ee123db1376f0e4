//! Filesystem corpus loader.
//!
//! Walks a directory up to a bounded depth and collects the contents of files
//! whose names end with one of the allowed extensions. I/O failures never
//! abort the walk: the offending entry is logged and skipped.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::SourceMap;

/// Common text and code file extensions collected when no allow-list is given.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".txt", ".md", ".py", ".java", ".c", ".cpp", ".html", ".css", ".js", ".ts", ".tsx", ".npc",
];

/// Load every matching file under `root` into a path → content map.
///
/// `depth` counts directory levels: 1 reads only files directly inside
/// `root`, 2 also reads its immediate subdirectories, and 0 reads nothing.
/// Keys are `root` joined with the relative path. Entries are visited in file
/// name order, so the result is stable across runs.
pub fn load_all_files(root: &Path, extensions: Option<&[&str]>, depth: usize) -> SourceMap {
    let mut text_data = SourceMap::new();
    if depth < 1 { return text_data; }
    let extensions: Vec<String> = match extensions {
        Some(exts) => exts.iter().map(|e| normalize_extension(e)).collect(),
        None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
    };

    let walker = WalkDir::new(root).min_depth(1).max_depth(depth).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let at = e.path().map(|p| p.display().to_string()).unwrap_or_else(|| root.display().to_string());
                warn!(path = %at, error = %e, "could not list directory entry, skipping");
                continue;
            }
        };
        if !entry.file_type().is_file() { continue; }
        let path = entry.path();
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if !extensions.iter().any(|ext| name.ends_with(ext.as_str())) { continue; }
        match fs::read(path) {
            Ok(bytes) => { text_data.insert(path.to_string_lossy().to_string(), String::from_utf8_lossy(&bytes).into_owned()); }
            Err(e) => warn!(path = %path.display(), error = %e, "could not read file, skipping"),
        }
    }
    debug!(root = %root.display(), depth, files = text_data.len(), "loaded corpus");
    text_data
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') { ext.to_string() } else { format!(".{ext}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gets_leading_dot() {
        assert_eq!(normalize_extension("rs"), ".rs");
        assert_eq!(normalize_extension(".rs"), ".rs");
    }
}
