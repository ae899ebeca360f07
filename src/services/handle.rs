use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::RecommenderConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Catalog, RatingMatrix};

use super::recommender::SimilarityIndex;

/// Shared pointer to the index currently serving queries
///
/// Readers clone the inner `Arc` and drop the lock before ranking. A rebuild
/// happens off to the side and only the finished index is swapped in, so a
/// query sees either the old index or the new one.
#[derive(Clone)]
pub struct IndexHandle {
    current: Arc<RwLock<Arc<SimilarityIndex>>>,
    config: Arc<RecommenderConfig>,
    snapshot_path: Option<PathBuf>,
}

impl IndexHandle {
    pub fn new(
        index: SimilarityIndex,
        config: RecommenderConfig,
        snapshot_path: Option<PathBuf>,
    ) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(index))),
            config: Arc::new(config),
            snapshot_path,
        }
    }

    /// The index serving queries right now
    pub async fn current(&self) -> Arc<SimilarityIndex> {
        self.current.read().await.clone()
    }

    /// Builds a new index on a blocking thread and swaps it in
    ///
    /// On failure the previous index keeps serving.
    pub async fn rebuild(
        &self,
        catalog: Catalog,
        ratings: RatingMatrix,
    ) -> AppResult<Arc<SimilarityIndex>> {
        let config = self.config.clone();
        let snapshot_path = self.snapshot_path.clone();

        let built = tokio::task::spawn_blocking(move || {
            SimilarityIndex::build_with_snapshot(
                catalog,
                &ratings,
                &config,
                snapshot_path.as_deref(),
            )
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        let index = match built {
            Ok(index) => Arc::new(index),
            Err(e) => {
                tracing::warn!(error = %e, "Index rebuild failed; keeping previous index");
                return Err(e);
            }
        };

        *self.current.write().await = index.clone();
        tracing::info!(
            movies = index.catalog().len(),
            fingerprint = %index.fingerprint(),
            "Swapped in rebuilt similarity index"
        );

        Ok(index)
    }
}
