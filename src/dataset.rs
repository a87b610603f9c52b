//! Dataset accessor with two lifecycle policies.
//!
//! Ephemeral rereads the file on every query, so mutations between queries
//! are always observed. Cached loads the file exactly once at first use and
//! serves that snapshot for the process lifetime; the one-shot
//! initialization is guarded so concurrent first queries trigger a single
//! disk read. Either way a query gets a self-consistent snapshot, never a
//! partially-read file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{SearchError, SearchResult};

/// Dataset lifecycle policy, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Reread the file on every query
    Ephemeral,
    /// Load once at first use, then serve from memory
    Cached,
}

impl CachePolicy {
    /// Map the configuration flag: reread-on-query means Ephemeral.
    pub fn from_reread_flag(reread_on_query: bool) -> Self {
        if reread_on_query {
            CachePolicy::Ephemeral
        } else {
            CachePolicy::Cached
        }
    }
}

impl std::fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CachePolicy::Ephemeral => f.write_str("ephemeral"),
            CachePolicy::Cached => f.write_str("cached"),
        }
    }
}

/// Owns access to the on-disk dataset
pub struct Dataset {
    path: PathBuf,
    policy: CachePolicy,
    cache: OnceCell<Arc<Vec<String>>>,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>, policy: CachePolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// An ordered snapshot of trimmed dataset lines.
    ///
    /// In Cached mode the first successful load wins the cell and every
    /// later call returns the same `Arc` without touching disk. A failed
    /// first load leaves the cell empty so a later query retries; a missing
    /// or unreadable dataset fails that query, never the process.
    pub async fn snapshot(&self) -> SearchResult<Arc<Vec<String>>> {
        match self.policy {
            CachePolicy::Ephemeral => Ok(Arc::new(self.load().await?)),
            CachePolicy::Cached => self
                .cache
                .get_or_try_init(|| async {
                    debug!(path = %self.path.display(), "Populating dataset cache");
                    Ok(Arc::new(self.load().await?))
                })
                .await
                .cloned(),
        }
    }

    async fn load(&self) -> SearchResult<Vec<String>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SearchError::dataset_unavailable(&self.path, e))?;

        Ok(contents
            .lines()
            .map(|line| line.trim().to_string())
            .collect())
    }
}
