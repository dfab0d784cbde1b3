/*!
 * Optional ignore rules applied during the walk
 */

use std::path::Path;

use glob_match::glob_match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, TreeClipError};

/// Rules deciding which entries are left out of an export
///
/// An empty filter excludes nothing and never touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Glob patterns matched against file names
    patterns: Vec<String>,
    /// Rules loaded from the root's `.gitignore`
    gitignore: Option<Gitignore>,
}

impl Filter {
    /// Filter that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a filter from name patterns and, optionally, `<root>/.gitignore`
    pub fn new(root: &Path, patterns: Vec<String>, respect_gitignore: bool) -> Result<Self> {
        let gitignore = if respect_gitignore {
            Some(load_gitignore(root)?)
        } else {
            None
        };

        Ok(Self {
            patterns,
            gitignore,
        })
    }

    /// Whether any rule is configured
    pub fn is_active(&self) -> bool {
        !self.patterns.is_empty() || self.gitignore.is_some()
    }

    /// Check if an entry should be left out
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();

        if self
            .patterns
            .iter()
            .any(|pattern| glob_match(pattern, &file_name))
        {
            return true;
        }

        match &self.gitignore {
            Some(gitignore) if path.starts_with(gitignore.path()) => gitignore
                .matched_path_or_any_parents(path, is_dir)
                .is_ignore(),
            _ => false,
        }
    }
}

/// Load `<root>/.gitignore`; a missing file yields an empty rule set
fn load_gitignore(root: &Path) -> Result<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);
    let file = root.join(".gitignore");

    if file.is_file() {
        if let Some(err) = builder.add(&file) {
            return Err(TreeClipError::Config(format!(
                "Failed to parse {}: {}",
                file.display(),
                err
            )));
        }
    }

    builder
        .build()
        .map_err(|e| TreeClipError::Config(format!("Invalid .gitignore rules: {}", e)))
}
