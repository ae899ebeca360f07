use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
/// Cell value for a rater who has not scored the movie
pub const UNRATED: u8 = 0;

/// Raters × movies grid of integer ratings, stored rater-major
///
/// The movie dimension must line up with catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRatings")]
pub struct RatingMatrix {
    raters: usize,
    movies: usize,
    cells: Vec<u8>,
}

#[derive(Deserialize)]
struct RawRatings {
    raters: usize,
    movies: usize,
    cells: Vec<u8>,
}

impl TryFrom<RawRatings> for RatingMatrix {
    type Error = AppError;

    fn try_from(raw: RawRatings) -> AppResult<Self> {
        Self::new(raw.raters, raw.movies, raw.cells)
    }
}

impl RatingMatrix {
    pub fn new(raters: usize, movies: usize, cells: Vec<u8>) -> AppResult<Self> {
        let expected = raters.checked_mul(movies).ok_or_else(|| {
            AppError::InvalidInput(format!("rating matrix {}x{} is too large", raters, movies))
        })?;
        if cells.len() != expected {
            return Err(AppError::InvalidInput(format!(
                "rating matrix {}x{} needs {} cells, got {}",
                raters,
                movies,
                expected,
                cells.len()
            )));
        }
        if let Some(bad) = cells
            .iter()
            .find(|&&r| r != UNRATED && !(MIN_RATING..=MAX_RATING).contains(&r))
        {
            return Err(AppError::InvalidInput(format!(
                "rating {} outside {}..={}",
                bad, MIN_RATING, MAX_RATING
            )));
        }
        Ok(Self {
            raters,
            movies,
            cells,
        })
    }

    /// Builds a matrix from one row per rater
    pub fn from_rows(rows: &[Vec<u8>]) -> AppResult<Self> {
        let movies = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != movies) {
            return Err(AppError::InvalidInput(
                "rating rows have different lengths".to_string(),
            ));
        }
        Self::new(rows.len(), movies, rows.concat())
    }

    /// No raters at all, aligned with a catalog of `movies` entries
    pub fn empty(movies: usize) -> Self {
        Self {
            raters: 0,
            movies,
            cells: Vec::new(),
        }
    }

    /// Seeded uniform ratings in the valid range
    pub fn simulated(raters: usize, movies: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cells = (0..raters * movies)
            .map(|_| rng.gen_range(MIN_RATING..=MAX_RATING))
            .collect();
        Self {
            raters,
            movies,
            cells,
        }
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn raters(&self) -> usize {
        self.raters
    }

    pub fn movies(&self) -> usize {
        self.movies
    }

    pub fn get(&self, rater: usize, movie: usize) -> u8 {
        self.cells[rater * self.movies + movie]
    }

    /// Every rater's score for one movie, as floats
    pub fn column(&self, movie: usize) -> Vec<f64> {
        (0..self.raters)
            .map(|rater| f64::from(self.get(rater, movie)))
            .collect()
    }
}
