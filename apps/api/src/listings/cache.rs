use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::listings::dataset::{resolve_snapshot, Dataset, LoadError};

struct CachedDataset {
    path: PathBuf,
    modified: SystemTime,
    dataset: Arc<Dataset>,
}

/// Process-wide cache of the loaded snapshot.
///
/// Keyed by the resolved snapshot path and its modification time: a newer
/// snapshot in the directory, or a rewrite of the same file, triggers a reload
/// on the next `get`. `invalidate` forces one.
pub struct DatasetCache {
    source: PathBuf,
    slot: RwLock<Option<CachedDataset>>,
}

fn cached(
    slot: &Option<CachedDataset>,
    path: &Path,
    modified: SystemTime,
) -> Option<Arc<Dataset>> {
    slot.as_ref()
        .filter(|cached| cached.path == path && cached.modified == modified)
        .map(|cached| Arc::clone(&cached.dataset))
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        let path = resolve_snapshot(&self.source)?;
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;

        {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(dataset) = cached(&slot, &path, modified) {
                debug!("Dataset cache hit for {}", path.display());
                return Ok(dataset);
            }
        }

        // Loading under the write lock: concurrent misses wait here and then
        // take the entry stored by whichever caller loaded first.
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = cached(&slot, &path, modified) {
            return Ok(dataset);
        }

        let dataset = Arc::new(Dataset::load(&path)?);
        *slot = Some(CachedDataset {
            path,
            modified,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// `get` on the blocking pool, for use from request handlers.
    pub async fn current(self: &Arc<Self>) -> Result<Arc<Dataset>, LoadError> {
        let cache = Arc::clone(self);
        tokio::task::spawn_blocking(move || cache.get()).await?
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            info!("Dataset cache invalidated");
        }
    }
}
