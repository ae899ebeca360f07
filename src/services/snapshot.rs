//! On-disk cache of a built hybrid matrix.
//!
//! A snapshot is only reused when its fingerprint matches the one computed
//! from the current catalog, ratings, and configuration.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::config::RecommenderConfig;
use crate::error::AppResult;
use crate::models::{Catalog, RatingMatrix};

use super::similarity::SimilarityMatrix;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    fingerprint: String,
    size: usize,
    cells: Vec<f64>,
}

/// Hex SHA-256 over the inputs that determine a similarity index
pub fn fingerprint(
    catalog: &Catalog,
    ratings: &RatingMatrix,
    config: &RecommenderConfig,
) -> AppResult<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(catalog)?);
    hasher.update(serde_json::to_vec(ratings)?);
    hasher.update(serde_json::to_vec(config)?);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Writes the matrix through a uniquely named staging file renamed into place
///
/// Failures are logged, not returned.
pub fn save(path: &Path, fingerprint: &str, matrix: &SimilarityMatrix) {
    match write_snapshot(path, fingerprint, matrix) {
        Ok(()) => {
            tracing::info!(path = %path.display(), size = matrix.size(), "Saved similarity snapshot")
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to save similarity snapshot")
        }
    }
}

fn write_snapshot(path: &Path, fingerprint: &str, matrix: &SimilarityMatrix) -> AppResult<()> {
    let snapshot = Snapshot {
        fingerprint: fingerprint.to_string(),
        size: matrix.size(),
        cells: matrix.cells().to_vec(),
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staging = NamedTempFile::new_in(dir)?;
    serde_json::to_writer(&mut staging, &snapshot)?;
    staging.flush()?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Returns the stored matrix, or `None` when absent, stale, or unreadable
pub fn load(path: &Path, fingerprint: &str) -> Option<SimilarityMatrix> {
    if !path.exists() {
        return None;
    }

    let snapshot: Snapshot = match read_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable similarity snapshot, ignoring");
            return None;
        }
    };
    if snapshot.fingerprint != fingerprint {
        tracing::info!(path = %path.display(), "Similarity snapshot is stale, ignoring");
        return None;
    }

    match SimilarityMatrix::from_cells(snapshot.size, snapshot.cells) {
        Ok(matrix) => Some(matrix),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed similarity snapshot, ignoring");
            None
        }
    }
}

fn read_snapshot(path: &Path) -> AppResult<Snapshot> {
    Ok(serde_json::from_slice(&std::fs::read(path)?)?)
}
