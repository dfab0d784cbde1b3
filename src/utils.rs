/*!
 * Utility functions for treeclip
 */

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::filter::Filter;

/// Path of `path` relative to `root`, joined with `/` on every platform
///
/// Both paths are expected to be absolute. A path outside `root` climbs out
/// with `..` segments; `root` itself yields the empty string.
pub fn relative_label(root: &Path, path: &Path) -> String {
    let root: Vec<Component> = root.components().collect();
    let path: Vec<Component> = path.components().collect();

    let shared = root
        .iter()
        .zip(path.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for component in &root[shared..] {
        if matches!(component, Component::Normal(_)) {
            parts.push("..".to_string());
        }
    }
    for component in &path[shared..] {
        if let Component::Normal(name) = component {
            parts.push(name.to_string_lossy().to_string());
        }
    }

    parts.join("/")
}

/// Make `path` absolute against `base` and drop `.` and `..` components
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Count files under the selections for progress tracking
///
/// Follows symlinks like the export does. Unreadable entries are skipped;
/// the export itself reports them.
pub fn count_files(selections: &[PathBuf], filter: &Filter) -> u64 {
    let mut count = 0;

    for selection in selections {
        let walker = WalkDir::new(selection)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !filter.is_excluded(entry.path(), entry.file_type().is_dir())
            });

        for entry in walker.filter_map(Result::ok) {
            if entry.file_type().is_file() && !filter.is_excluded(entry.path(), false) {
                count += 1;
            }
        }
    }

    count
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Format a number with human-readable units
pub fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}
