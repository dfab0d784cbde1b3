//! Metadata cache implementation

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::debug;

use crate::fs::FileSystem;
use crate::types::{Metadata, DEFAULT_CACHE_TTL};

/// Cached metadata with the instant it was captured
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    metadata: Metadata,
    captured_at: Instant,
}

/// Statistics for the metadata cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: usize,
    /// Number of lookups that went to the filesystem
    pub misses: usize,
}

/// Short-lived memoization of metadata lookups
///
/// Entries are only trusted while younger than the TTL; an older entry is
/// refreshed in place on the next lookup. Two concurrent misses on the same
/// path both hit the filesystem. The cache is not `Sync` and must stay on the
/// thread driving the export.
#[derive(Debug)]
pub struct MetadataCache {
    ttl: Duration,
    entries: RefCell<HashMap<PathBuf, CacheEntry>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl MetadataCache {
    /// Create an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Get metadata for `path`, consulting `fs` on a miss or a stale entry
    pub async fn get<F>(&self, fs: &F, path: &Path) -> io::Result<Metadata>
    where
        F: FileSystem + ?Sized,
    {
        let now = Instant::now();
        let cached = self.entries.borrow().get(path).copied();

        if let Some(entry) = cached {
            if now.duration_since(entry.captured_at) < self.ttl {
                self.hits.set(self.hits.get() + 1);
                return Ok(entry.metadata);
            }
        }

        self.misses.set(self.misses.get() + 1);
        debug!("metadata cache miss: {}", path.display());

        let metadata = fs.metadata(path).await?;
        self.entries.borrow_mut().insert(
            path.to_path_buf(),
            CacheEntry {
                metadata,
                captured_at: now,
            },
        );

        Ok(metadata)
    }

    /// Number of stored entries, stale ones included
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Hit and miss counters since creation or the last clear
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        self.hits.set(0);
        self.misses.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::CountingFs;
    use crate::types::EntryKind;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_hit_within_ttl() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "a")?;

        let counting = CountingFs::default();
        let cache = MetadataCache::new(Duration::from_secs(60));

        assert_eq!(cache.get(&counting, &path).await?.kind, EntryKind::File);
        assert_eq!(cache.get(&counting, &path).await?.kind, EntryKind::File);

        assert_eq!(counting.metadata_calls(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_after_ttl() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("entry");
        fs::write(&path, "a")?;

        let counting = CountingFs::default();
        let cache = MetadataCache::new(Duration::from_millis(250));

        assert_eq!(cache.get(&counting, &path).await?.kind, EntryKind::File);

        // Replace the file with a directory of the same name
        fs::remove_file(&path)?;
        fs::create_dir(&path)?;
        assert_eq!(cache.get(&counting, &path).await?.kind, EntryKind::File);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(cache.get(&counting, &path).await?.kind, EntryKind::Directory);
        assert_eq!(counting.metadata_calls(), 2);
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_path_is_not_cached() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("missing");
        let counting = CountingFs::default();
        let cache = MetadataCache::default();

        assert!(cache.get(&counting, &path).await.is_err());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let counting = CountingFs::default();
        let cache = MetadataCache::default();

        cache.get(&counting, temp_dir.path()).await?;
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        Ok(())
    }
}
