/*!
 * Export orchestration: tree phase, separator, content phase
 */

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::future::try_join_all;
use indicatif::ProgressBar;
use log::{debug, info};

use crate::cache::MetadataCache;
use crate::config::Config;
use crate::contents::FileBlock;
use crate::ensure;
use crate::error::{Result, ResultExt, TreeClipError};
use crate::filter::Filter;
use crate::fs::{FileSystem, LocalFs};
use crate::retry::RetryPolicy;
use crate::types::{EntryKind, FileStats, Metadata, DEFAULT_CACHE_TTL, PHASE_SEPARATOR, ROOT_INDENT};
use crate::utils::relative_label;

/// Settings for an [`Exporter`]
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Project root; labels are relative to it
    pub root: PathBuf,
    /// Metadata cache time-to-live
    pub cache_ttl: Duration,
    /// Retry policy for file reads
    pub retry: RetryPolicy,
    /// Entries to leave out
    pub filter: Filter,
}

impl ExportOptions {
    /// Default options for a project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            retry: RetryPolicy::default(),
            filter: Filter::none(),
        }
    }
}

impl From<&Config> for ExportOptions {
    fn from(config: &Config) -> Self {
        Self {
            root: config.root.clone(),
            cache_ttl: config.cache_ttl,
            retry: config.retry,
            filter: config.filter.clone(),
        }
    }
}

/// Statistics for the most recent export
#[derive(Debug, Clone, Default)]
pub struct ExportStats {
    /// Label and statistics of every file block written, in output order
    pub files: Vec<(String, FileStats)>,
    /// Failed read attempts that were retried successfully
    pub retries: u32,
}

impl ExportStats {
    /// Number of file blocks written
    pub fn files_exported(&self) -> usize {
        self.files.len()
    }

    /// Total lines over all file blocks
    pub fn total_lines(&self) -> usize {
        self.files.iter().map(|(_, stats)| stats.lines).sum()
    }

    /// Total characters over all file blocks
    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|(_, stats)| stats.chars).sum()
    }
}

/// Builds the tree listing and content dump for a selection
///
/// Owns the metadata cache for the life of the process; call
/// [`Exporter::shutdown`] to release it. Exports run on a single-threaded
/// runtime: siblings are awaited concurrently and reassembled by index.
pub struct Exporter<F: FileSystem = LocalFs> {
    pub(crate) fs: F,
    pub(crate) root: PathBuf,
    pub(crate) cache: MetadataCache,
    pub(crate) retry: RetryPolicy,
    pub(crate) filter: Filter,
    pub(crate) progress: ProgressBar,
    pub(crate) stats: RefCell<ExportStats>,
}

impl Exporter<LocalFs> {
    /// Create an exporter over the local disk
    pub fn new(options: ExportOptions) -> Self {
        Self::with_fs(LocalFs, options)
    }
}

impl<F: FileSystem> Exporter<F> {
    /// Create an exporter over a custom filesystem
    pub fn with_fs(fs: F, options: ExportOptions) -> Self {
        Self {
            fs,
            root: options.root,
            cache: MetadataCache::new(options.cache_ttl),
            retry: options.retry,
            filter: options.filter,
            progress: ProgressBar::hidden(),
            stats: RefCell::new(ExportStats::default()),
        }
    }

    /// Report each exported file on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Underlying filesystem
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Metadata cache shared by all exports
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Statistics of the most recent export
    pub fn stats(&self) -> ExportStats {
        self.stats.borrow().clone()
    }

    /// Release process-wide state
    pub fn shutdown(&self) {
        debug!("clearing {} cached metadata entries", self.cache.len());
        self.cache.clear();
    }

    /// Produce the full export text for `selections`
    ///
    /// Fails with `InvalidInput` before any I/O when `selections` is empty.
    /// Any IO failure aborts the whole export.
    pub async fn export(&self, selections: &[PathBuf]) -> Result<String> {
        ensure!(
            !selections.is_empty(),
            InvalidInput,
            "Please select files or folders to export."
        );

        self.stats.replace(ExportStats::default());
        let selections = self.apply_filter(selections).await?;

        info!(
            "Exporting {} selection(s) under {}",
            selections.len(),
            self.root.display()
        );

        let tree = self.render_tree_phase(&selections).await?;
        let contents = self.render_content_phase(&selections).await?;

        let mut output = String::with_capacity(tree.len() + PHASE_SEPARATOR.len() + contents.len());
        output.push_str(&tree);
        output.push_str(PHASE_SEPARATOR);
        output.push_str(&contents);

        info!(
            "Exported {} file(s), {} bytes",
            self.stats.borrow().files_exported(),
            output.len()
        );

        Ok(output)
    }

    /// Label lines and subtrees for every selection, in selection order
    pub async fn render_tree_phase(&self, selections: &[PathBuf]) -> Result<String> {
        let chunks = try_join_all(selections.iter().map(|selection| self.tree_entry(selection))).await?;
        Ok(chunks.concat())
    }

    /// File blocks for every selection, in selection order
    pub async fn render_content_phase(&self, selections: &[PathBuf]) -> Result<String> {
        let blocks =
            try_join_all(selections.iter().map(|selection| self.content_entry(selection))).await?;
        Ok(self.record(blocks.into_iter().flatten().collect()))
    }

    async fn tree_entry(&self, selection: &Path) -> Result<String> {
        let mut chunk = format!("{}\n", relative_label(&self.root, selection));

        if self.metadata(selection).await?.is_dir() {
            chunk.push_str(&self.render_tree(selection, ROOT_INDENT.to_string()).await?);
        }

        Ok(chunk)
    }

    async fn content_entry(&self, selection: &Path) -> Result<Vec<FileBlock>> {
        match self.metadata(selection).await?.kind {
            EntryKind::File => Ok(vec![self.file_block(selection, &self.root).await?]),
            EntryKind::Directory => self.collect_contents(selection, &self.root).await,
            EntryKind::Other => Ok(Vec::new()),
        }
    }

    /// Drop top-level selections excluded by the filter
    async fn apply_filter(&self, selections: &[PathBuf]) -> Result<Vec<PathBuf>> {
        if !self.filter.is_active() {
            return Ok(selections.to_vec());
        }

        let checks = selections.iter().map(|selection| async move {
            let metadata = self.metadata(selection).await?;
            let excluded = self.filter.is_excluded(selection, metadata.is_dir());
            if excluded {
                debug!("skipping ignored selection {}", selection.display());
            }
            Ok::<_, TreeClipError>((!excluded).then(|| selection.clone()))
        });

        let kept: Vec<PathBuf> = try_join_all(checks).await?.into_iter().flatten().collect();
        ensure!(
            !kept.is_empty(),
            InvalidInput,
            "All selected files or folders are excluded by ignore rules."
        );

        Ok(kept)
    }

    /// Cached metadata lookup with the path attached to failures
    pub(crate) async fn metadata(&self, path: &Path) -> Result<Metadata> {
        self.cache.get(&self.fs, path).await.with_path(path)
    }

    /// Sorted, filtered names of the children of `dir`
    pub(crate) async fn list_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = self.fs.read_dir(dir).await.with_path(dir)?;
        names.sort();
        debug!("listed {} entries in {}", names.len(), dir.display());

        if !self.filter.is_active() {
            return Ok(names);
        }

        let checks = names.into_iter().map(|name| async move {
            let path = dir.join(&name);
            let metadata = self.metadata(&path).await?;
            let keep = !self.filter.is_excluded(&path, metadata.is_dir());
            Ok::<_, TreeClipError>(keep.then_some(name))
        });

        Ok(try_join_all(checks).await?.into_iter().flatten().collect())
    }
}
