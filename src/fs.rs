/*!
 * Filesystem access used by the exporter
 *
 * Every lookup the renderers make goes through the [`FileSystem`] trait so
 * the walk can be driven against the real disk or against a wrapper that
 * injects failures.
 */

use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::types::Metadata;

/// Asynchronous filesystem operations needed for an export
///
/// Futures are not required to be `Send`: exports run on a single-threaded
/// runtime.
#[async_trait(?Send)]
pub trait FileSystem {
    /// Metadata for `path`, following symlinks
    async fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Names of the immediate children of `path`, in enumeration order
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Full text of the file at `path`
    async fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Local disk backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait(?Send)]
impl FileSystem for LocalFs {
    async fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(Metadata::from(&meta))
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(path).await?;

        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }

        Ok(names)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        // Invalid UTF-8 is replaced rather than failing the export
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_metadata_kinds() -> io::Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("a.txt"), "hello")?;
        fs::create_dir(temp_dir.path().join("sub"))?;

        let file = LocalFs.metadata(&temp_dir.path().join("a.txt")).await?;
        assert_eq!(file.kind, EntryKind::File);

        let dir = LocalFs.metadata(&temp_dir.path().join("sub")).await?;
        assert_eq!(dir.kind, EntryKind::Directory);

        let missing = LocalFs.metadata(&temp_dir.path().join("nope")).await;
        assert_eq!(missing.unwrap_err().kind(), io::ErrorKind::NotFound);

        Ok(())
    }

    #[tokio::test]
    async fn test_local_read_dir_and_text() -> io::Result<()> {
        let temp_dir = tempdir()?;
        fs::write(temp_dir.path().join("b.txt"), "b")?;
        fs::write(temp_dir.path().join("a.txt"), "a")?;

        let mut names = LocalFs.read_dir(temp_dir.path()).await?;
        names.sort();
        assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);

        fs::write(temp_dir.path().join("bin.dat"), [0x66, 0xff, 0x6f])?;
        let text = LocalFs.read_text(&temp_dir.path().join("bin.dat")).await?;
        assert_eq!(text, "f\u{fffd}o");

        Ok(())
    }
}
