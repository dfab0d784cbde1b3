/*!
 * Indented ASCII tree rendering
 */

use std::path::Path;

use futures::future::{try_join_all, FutureExt, LocalBoxFuture};

use crate::error::{Result, TreeClipError};
use crate::exporter::Exporter;
use crate::fs::FileSystem;
use crate::types::{BLANK_INDENT, BRANCH, LAST_BRANCH, PIPE_INDENT};

impl<F: FileSystem> Exporter<F> {
    /// Render the subtree below `dir`, one line per entry
    ///
    /// Children are sorted by code point. Each line is
    /// `{indent}{connector}{name}\n`; directories are followed by their own
    /// subtree with the indent extended. Sibling subtrees are computed
    /// concurrently but spliced back in sorted order. An empty directory
    /// renders as the empty string.
    pub fn render_tree<'a>(
        &'a self,
        dir: &'a Path,
        indent: String,
    ) -> LocalBoxFuture<'a, Result<String>> {
        async move {
            let names = self.list_dir(dir).await?;
            let last = names.len().saturating_sub(1);

            let children = names.into_iter().enumerate().map(|(index, name)| {
                let indent = indent.as_str();
                let is_last = index == last;

                async move {
                    let path = dir.join(&name);
                    let metadata = self.metadata(&path).await?;

                    let connector = if is_last { LAST_BRANCH } else { BRANCH };
                    let mut chunk = format!("{indent}{connector}{name}\n");

                    if metadata.is_dir() {
                        let extension = if is_last { BLANK_INDENT } else { PIPE_INDENT };
                        let subtree = self.render_tree(&path, format!("{indent}{extension}")).await?;
                        chunk.push_str(&subtree);
                    }

                    Ok::<_, TreeClipError>(chunk)
                }
            });

            Ok(try_join_all(children).await?.concat())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fast_options;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_connectors_and_indent() -> Result<()> {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b").join("inner")).unwrap();
        fs::write(root.join("a.txt"), "").unwrap();
        fs::write(root.join("b").join("x.txt"), "").unwrap();
        fs::write(root.join("b").join("inner").join("y.txt"), "").unwrap();
        fs::write(root.join("c.txt"), "").unwrap();

        let exporter = Exporter::new(fast_options(root));
        let tree = exporter.render_tree(root, String::new()).await?;

        assert_eq!(
            tree,
            concat!(
                "├── a.txt\n",
                "├── b\n",
                "│   ├── inner\n",
                "│   │   └── y.txt\n",
                "│   └── x.txt\n",
                "└── c.txt\n",
            )
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_last_directory_uses_blank_indent() -> Result<()> {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("z").join("deep")).unwrap();
        fs::write(root.join("z").join("deep").join("f"), "").unwrap();

        let exporter = Exporter::new(fast_options(root));
        let tree = exporter.render_tree(root, "  ".to_string()).await?;

        assert_eq!(tree, "  └── z\n      └── deep\n          └── f\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_code_point_ordering() -> Result<()> {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        for name in ["b.txt", "C.txt", "_x", "a.txt", "Z.txt"] {
            fs::write(root.join(name), "").unwrap();
        }

        let exporter = Exporter::new(fast_options(root));
        let tree = exporter.render_tree(root, String::new()).await?;
        let names: Vec<&str> = tree
            .lines()
            .map(|line| line.trim_start_matches(BRANCH).trim_start_matches(LAST_BRANCH))
            .collect();

        assert_eq!(names, vec!["C.txt", "Z.txt", "_x", "a.txt", "b.txt"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_directory() -> Result<()> {
        let temp_dir = tempdir().unwrap();
        let exporter = Exporter::new(fast_options(temp_dir.path()));

        assert_eq!(exporter.render_tree(temp_dir.path(), "  ".to_string()).await?, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_unlistable_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone");
        let exporter = Exporter::new(fast_options(temp_dir.path()));

        let err = exporter
            .render_tree(&missing, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TreeClipError::Io { .. }));
    }
}
