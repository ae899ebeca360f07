use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Catalog, Movie, MovieId, MovieRef, RatingMatrix};
use crate::services::Recommendation;

use super::extract::{ApiPath, ApiQuery};
use super::AppState;

const DEFAULT_TRENDING: usize = 5;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    /// Comma-separated genre filter
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: Option<String>,
    pub id: Option<u64>,
    pub k: Option<usize>,
}

impl RecommendationQuery {
    fn movie_ref(&self) -> AppResult<MovieRef> {
        match (&self.title, self.id) {
            (Some(title), None) => Ok(MovieRef::Title(title.clone())),
            (None, Some(id)) => Ok(MovieRef::Id(MovieId(id))),
            _ => Err(AppError::InvalidInput(
                "exactly one of `title` or `id` is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RebuildRequest {
    pub movies: Vec<Movie>,
    /// Omitted ratings leave the preference signal empty
    pub ratings: Option<RatingMatrix>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: MovieId,
    pub title: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub poster: String,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            genres: movie.genre_tags.clone(),
            keywords: movie.keywords.clone(),
            poster: movie.poster_reference.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendedMovie {
    #[serde(flatten)]
    pub movie: MovieResponse,
    pub score: f64,
}

impl From<&Recommendation> for RecommendedMovie {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            movie: MovieResponse::from(&recommendation.movie),
            score: recommendation.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: MovieResponse,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Serialize)]
pub struct RebuildResponse {
    pub movies: usize,
    pub vocabulary: usize,
    pub fingerprint: String,
    pub built_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the catalog, optionally filtered by genre
pub async fn get_movies(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<MoviesQuery>,
) -> Json<Vec<MovieResponse>> {
    let genres: Vec<String> = params
        .genre
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();

    let index = state.index.current().await;
    let movies = index
        .catalog()
        .by_genre(&genres)
        .into_iter()
        .map(MovieResponse::from)
        .collect();
    Json(movies)
}

/// Leading catalog entries for the landing page
pub async fn get_trending(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TrendingQuery>,
) -> Json<Vec<MovieResponse>> {
    let index = state.index.current().await;
    let movies = index
        .catalog()
        .trending(params.limit.unwrap_or(DEFAULT_TRENDING))
        .iter()
        .map(MovieResponse::from)
        .collect();
    Json(movies)
}

/// Get one movie by id
pub async fn get_movie(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> AppResult<Json<MovieResponse>> {
    let index = state.index.current().await;
    let catalog = index.catalog();
    let position = catalog.resolve(&MovieRef::Id(MovieId(id)))?;
    let movie = catalog
        .get(position)
        .ok_or_else(|| AppError::Internal(format!("catalog position {} missing", position)))?;
    Ok(Json(MovieResponse::from(movie)))
}

/// Distinct genres across the catalog
pub async fn get_genres(State(state): State<AppState>) -> Json<Vec<String>> {
    let index = state.index.current().await;
    Json(index.catalog().genres())
}

/// Movies most similar to the requested one
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    ApiQuery(params): ApiQuery<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let movie = params.movie_ref()?;
    let index = state.index.current().await;
    let k = params.k.unwrap_or(index.default_k());

    tracing::info!(
        request_id = %request_id,
        movie = %movie,
        k,
        "Processing recommendation request"
    );

    let recommendations = index.recommend(&movie, k)?;
    let position = index.catalog().resolve(&movie)?;
    let query = index
        .catalog()
        .get(position)
        .map(MovieResponse::from)
        .ok_or_else(|| AppError::Internal(format!("catalog position {} missing", position)))?;

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(RecommendationResponse {
        query,
        recommendations: recommendations.iter().map(RecommendedMovie::from).collect(),
    }))
}

/// Replace the catalog and rebuild the similarity index
pub async fn rebuild_catalog(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RebuildRequest>,
) -> AppResult<Json<RebuildResponse>> {
    tracing::info!(
        request_id = %request_id,
        movies = request.movies.len(),
        "Processing catalog rebuild"
    );

    let catalog = Catalog::new(request.movies)?;
    let ratings = request
        .ratings
        .unwrap_or_else(|| RatingMatrix::empty(catalog.len()));

    let index = state.index.rebuild(catalog, ratings).await?;

    Ok(Json(RebuildResponse {
        movies: index.catalog().len(),
        vocabulary: index.vocabulary().len(),
        fingerprint: index.fingerprint().to_string(),
        built_at: index.built_at(),
    }))
}
