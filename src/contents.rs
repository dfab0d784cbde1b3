/*!
 * Fenced file-content rendering
 */

use std::path::Path;

use futures::future::{try_join_all, FutureExt, LocalBoxFuture};

use crate::error::{Result, ResultExt};
use crate::exporter::Exporter;
use crate::fs::FileSystem;
use crate::retry::read_with_retry;
use crate::types::{EntryKind, FileStats, FENCE};
use crate::utils::relative_label;

/// One rendered file block and the statistics measured while reading it
pub(crate) struct FileBlock {
    label: String,
    stats: FileStats,
    text: String,
}

impl<F: FileSystem> Exporter<F> {
    /// Render a fenced block for every file below `dir`
    ///
    /// Directories contribute only their files' blocks. Labels are relative
    /// to `root`. Children are read concurrently and assembled in listing
    /// order.
    pub async fn render_contents(&self, dir: &Path, root: &Path) -> Result<String> {
        let blocks = self.collect_contents(dir, root).await?;
        Ok(self.record(blocks))
    }

    /// Render one file as `File: {label}` followed by its fenced text
    pub async fn render_file(&self, path: &Path, root: &Path) -> Result<String> {
        let block = self.file_block(path, root).await?;
        Ok(self.record(vec![block]))
    }

    pub(crate) fn collect_contents<'a>(
        &'a self,
        dir: &'a Path,
        root: &'a Path,
    ) -> LocalBoxFuture<'a, Result<Vec<FileBlock>>> {
        async move {
            let names = self.list_dir(dir).await?;

            let children = names.into_iter().map(|name| async move {
                let path = dir.join(&name);
                match self.metadata(&path).await?.kind {
                    EntryKind::File => Ok(vec![self.file_block(&path, root).await?]),
                    EntryKind::Directory => self.collect_contents(&path, root).await,
                    EntryKind::Other => Ok(Vec::new()),
                }
            });

            Ok(try_join_all(children).await?.into_iter().flatten().collect())
        }
        .boxed_local()
    }

    pub(crate) async fn file_block(&self, path: &Path, root: &Path) -> Result<FileBlock> {
        let outcome = read_with_retry(&self.fs, path, self.retry)
            .await
            .with_path(path)?;
        let label = relative_label(root, path);

        self.progress.inc(1);
        self.progress.set_message(label.clone());
        self.stats.borrow_mut().retries += outcome.retries;

        let mut text = String::with_capacity(label.len() + outcome.text.len() + 24);
        text.push_str("File: ");
        text.push_str(&label);
        text.push('\n');
        text.push_str(FENCE);
        text.push('\n');
        text.push_str(&outcome.text);
        text.push('\n');
        text.push_str(FENCE);
        text.push_str("\n\n");

        Ok(FileBlock {
            stats: FileStats::measure(&outcome.text),
            label,
            text,
        })
    }

    /// Append the blocks' statistics in output order and join their text
    pub(crate) fn record(&self, blocks: Vec<FileBlock>) -> String {
        let mut stats = self.stats.borrow_mut();
        let mut output = String::with_capacity(blocks.iter().map(|block| block.text.len()).sum());

        for block in blocks {
            output.push_str(&block.text);
            stats.files.push((block.label, block.stats));
        }

        output
    }
}
