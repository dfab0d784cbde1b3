//! Global error handling for treeclip
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for treeclip operations
#[derive(Error, Debug)]
pub enum TreeClipError {
    /// Empty or unusable selection
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Metadata lookup, directory listing or file read failure
    #[error("IO error: {}: {source}", .path.display())]
    Io {
        /// Path the operation failed on
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },

    /// Clipboard delivery errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TreeClipError {
    /// Whether this error was caused by the caller's selection
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Specialized Result type for treeclip operations
pub type Result<T> = std::result::Result<T, TreeClipError>;

/// Creates a TreeClipError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::TreeClipError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching the failing path to IO errors
pub trait ResultExt<T> {
    /// Convert an `io::Error` into `TreeClipError::Io` for `path`
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|source| TreeClipError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// Allow converting TreeClipError to io::Error for callers that speak io::Result
impl From<TreeClipError> for io::Error {
    fn from(err: TreeClipError) -> Self {
        match err {
            TreeClipError::Io { source, .. } => source,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
