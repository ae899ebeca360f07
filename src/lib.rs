//! Hybrid content + preference movie recommender.
//!
//! A [`services::SimilarityIndex`] is built once from a [`models::Catalog`] and
//! a [`models::RatingMatrix`] and then answers "top-K most similar to X"
//! queries. The `api` module exposes it over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
