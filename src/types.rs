/*!
 * Core types and data structures for the treeclip application
 */

use std::fs;
use std::time::Duration;

/// Connector for every child except the last one
pub const BRANCH: &str = "├── ";
/// Connector for the last child of a directory
pub const LAST_BRANCH: &str = "└── ";
/// Indent added below a child that has later siblings
pub const PIPE_INDENT: &str = "│   ";
/// Indent added below the last child
pub const BLANK_INDENT: &str = "    ";
/// Indent of the first tree level under a top-level directory selection
pub const ROOT_INDENT: &str = "  ";
/// Separator between the tree phase and the content phase
pub const PHASE_SEPARATOR: &str = "\n\n";
/// Code fence wrapped around file contents
pub const FENCE: &str = "```";

/// Default metadata cache time-to-live
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(5000);
/// Default number of read retries after the first attempt
pub const DEFAULT_READ_RETRIES: u32 = 3;
/// Default pause between read attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Represents different kinds of filesystem entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory containing other entries
    Directory,
    /// Sockets, FIFOs, devices
    Other,
}

/// Metadata about a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Kind of entry, after following symlinks
    pub kind: EntryKind,
}

impl Metadata {
    /// Whether the entry is a regular file
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether the entry is a directory
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

impl From<&fs::Metadata> for Metadata {
    fn from(meta: &fs::Metadata) -> Self {
        let kind = if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Self { kind }
    }
}

/// Per-file statistics collected while rendering contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

impl FileStats {
    /// Measure a file's text
    pub fn measure(text: &str) -> Self {
        Self {
            lines: text.lines().count(),
            chars: text.chars().count(),
        }
    }
}
