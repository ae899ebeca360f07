use std::cmp::Ordering;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::RecommenderConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Catalog, Movie, MovieRef, RatingMatrix};

use super::encoder::{FeatureEncoder, Vocabulary};
use super::fusion::fuse;
use super::similarity::{content_similarity, preference_similarity, SimilarityMatrix};
use super::snapshot;

/// A recommended movie with its hybrid similarity to the queried one
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie: Movie,
    pub score: f64,
}

/// Immutable hybrid similarity index over one catalog
///
/// Built once from a catalog, a rating matrix, and a configuration. Queries
/// only read from it, so it can be shared freely across threads.
#[derive(Debug)]
pub struct SimilarityIndex {
    catalog: Catalog,
    vocabulary: Vocabulary,
    hybrid: SimilarityMatrix,
    fingerprint: String,
    default_k: usize,
    built_at: DateTime<Utc>,
}

impl SimilarityIndex {
    /// Encodes the catalog, builds both similarity matrices and fuses them
    pub fn build(
        catalog: Catalog,
        ratings: &RatingMatrix,
        config: &RecommenderConfig,
    ) -> AppResult<Self> {
        Self::build_with_snapshot(catalog, ratings, config, None)
    }

    /// Like [`SimilarityIndex::build`], reusing a fresh snapshot at `snapshot_path`
    /// and writing one when none matched
    pub fn build_with_snapshot(
        catalog: Catalog,
        ratings: &RatingMatrix,
        config: &RecommenderConfig,
        snapshot_path: Option<&Path>,
    ) -> AppResult<Self> {
        config.validate()?;
        if catalog.is_empty() {
            return Err(AppError::EmptyCatalog);
        }
        if ratings.movies() != catalog.len() {
            return Err(AppError::ShapeMismatch {
                left: catalog.len(),
                right: ratings.movies(),
            });
        }

        let fingerprint = snapshot::fingerprint(&catalog, ratings, config)?;
        let encoded = FeatureEncoder::new(config.max_features, &config.stopwords).encode(&catalog);

        let cached = match snapshot_path {
            Some(path) => {
                snapshot::load(path, &fingerprint).filter(|matrix| matrix.size() == catalog.len())
            }
            None => None,
        };

        let hybrid = match cached {
            Some(matrix) => {
                tracing::info!(movies = catalog.len(), "Reusing similarity snapshot");
                matrix
            }
            None => {
                let content = content_similarity(&encoded.vectors)?;
                let preference = preference_similarity(ratings);
                let hybrid = fuse(&content, &preference, config.fusion_weights)?;
                if let Some(path) = snapshot_path {
                    snapshot::save(path, &fingerprint, &hybrid);
                }
                hybrid
            }
        };

        tracing::info!(
            movies = catalog.len(),
            vocabulary = encoded.vocabulary.len(),
            raters = ratings.raters(),
            fingerprint = %fingerprint,
            "Built similarity index"
        );

        Ok(Self {
            catalog,
            vocabulary: encoded.vocabulary,
            hybrid,
            fingerprint,
            default_k: config.default_k,
            built_at: Utc::now(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn hybrid(&self) -> &SimilarityMatrix {
        &self.hybrid
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Top `k` movies most similar to `movie`, never including itself
    ///
    /// Ties are broken by catalog position. Fewer than `k` results come back
    /// when the catalog is small.
    pub fn recommend(&self, movie: &MovieRef, k: usize) -> AppResult<Vec<Recommendation>> {
        if k == 0 {
            return Err(AppError::InvalidConfig(
                "k must be greater than 0".to_string(),
            ));
        }

        let query = self.catalog.resolve(movie)?;
        let row = self.hybrid.row(query);

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, _)| *index != query)
            .collect();
        ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });

        Ok(ranked
            .into_iter()
            .take(k)
            .filter_map(|(index, score)| {
                self.catalog.get(index).map(|m| Recommendation {
                    movie: m.clone(),
                    score,
                })
            })
            .collect())
    }
}
