use crate::config::FusionWeights;
use crate::error::{AppError, AppResult};

use super::similarity::SimilarityMatrix;

/// Weighted element-wise mean of the content and preference matrices
///
/// Both matrices must be built against the same catalog; row i has to name the
/// same movie in each.
pub fn fuse(
    content: &SimilarityMatrix,
    preference: &SimilarityMatrix,
    weights: FusionWeights,
) -> AppResult<SimilarityMatrix> {
    weights.validate()?;

    if content.size() != preference.size() {
        return Err(AppError::ShapeMismatch {
            left: content.size(),
            right: preference.size(),
        });
    }

    let cells = content
        .cells()
        .iter()
        .zip(preference.cells())
        .map(|(c, p)| weights.content * c + weights.preference * p)
        .collect();

    SimilarityMatrix::from_cells(content.size(), cells)
}
