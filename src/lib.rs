/*!
 * treeclip - Copy a project tree listing and file contents to the clipboard
 *
 * This library renders a selection of files and folders as an indented tree
 * followed by every selected file's contents in fenced blocks, ready to be
 * pasted as context for Large Language Models.
 */

pub mod cache;
pub mod clipboard;
pub mod config;
mod contents;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod fs;
pub mod report;
pub mod retry;
mod tree;
pub mod types;
pub mod utils;


// Re-export main components for easier access
pub use cache::{CacheStats, MetadataCache};
pub use config::{Args, Config, Destination};
pub use error::{Result, TreeClipError};
pub use exporter::{ExportOptions, ExportStats, Exporter};
pub use filter::Filter;
pub use fs::{FileSystem, LocalFs};
pub use report::{ExportReport, Reporter};
pub use retry::{read_with_retry, RetryPolicy};
pub use types::{EntryKind, FileStats, Metadata};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
