use axum_test::TestServer;
use serde_json::json;

use cinematch::api::{create_router, AppState};
use cinematch::config::RecommenderConfig;
use cinematch::models::{Catalog, RatingMatrix};
use cinematch::services::{IndexHandle, SimilarityIndex};

fn create_test_server() -> TestServer {
    let catalog = Catalog::sample();
    let ratings = RatingMatrix::simulated(5, catalog.len(), 42);
    let config = RecommenderConfig::default();
    let index = SimilarityIndex::build(catalog, &ratings, &config).unwrap();
    let state = AppState::new(IndexHandle::new(index, config, None));
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c1c7e-3b0a-4d2c-9a53-5d7d3c1e2f10";
    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_list_and_filter_movies() {
    let server = create_test_server();

    let response = server.get("/movies").await;
    response.assert_status_ok();
    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 7);
    assert_eq!(movies[0]["title"], "Inception");
    assert_eq!(movies[0]["genres"], json!(["Action", "Sci-Fi"]));

    let response = server.get("/movies").add_query_param("genre", "Drama,Crime").await;
    let movies: Vec<serde_json::Value> = response.json();
    let titles: Vec<&str> = movies.iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Titanic", "Joker"]);
}

#[tokio::test]
async fn test_trending_and_genres() {
    let server = create_test_server();

    let response = server.get("/movies/trending").await;
    response.assert_status_ok();
    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 5);

    let response = server.get("/genres").await;
    let genres: Vec<String> = response.json();
    assert!(genres.contains(&"Sci-Fi".to_string()));
}

#[tokio::test]
async fn test_get_movie_by_id() {
    let server = create_test_server();

    let response = server.get("/movies/5").await;
    response.assert_status_ok();
    let movie: serde_json::Value = response.json();
    assert_eq!(movie["title"], "Titanic");

    let response = server.get("/movies/999").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommend_by_title() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", 3)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["query"]["title"], "Inception");
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);
    assert!(recommendations.iter().all(|r| r["title"] != "Inception"));

    let scores: Vec<f64> = recommendations
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_recommend_defaults_to_five() {
    let server = create_test_server();

    let response = server.get("/recommendations").add_query_param("id", 2).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_recommend_unknown_movie() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "NoSuchMovie")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("NoSuchMovie"));
}

#[tokio::test]
async fn test_recommend_rejects_bad_queries() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", 0)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let response = server.get("/recommendations").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_parameters_return_json_errors() {
    let server = create_test_server();

    let response = server
        .get("/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", -1)
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Invalid input"));

    let response = server.get("/movies/not-a-number").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_rebuild_catalog_swaps_index() {
    let server = create_test_server();

    let response = server
        .post("/catalog")
        .json(&json!({
            "movies": [
                {"id": 1, "title": "Inception", "genre_tags": ["Action", "Sci-Fi"], "keywords": ["dream", "heist"]},
                {"id": 2, "title": "Interstellar", "genre_tags": ["Adventure", "Sci-Fi"], "keywords": ["space", "travel"]},
                {"id": 3, "title": "Titanic", "genre_tags": ["Romance", "Drama"], "keywords": ["love", "ship"]}
            ]
        }))
        .await;
    response.assert_status_ok();
    let rebuilt: serde_json::Value = response.json();
    assert_eq!(rebuilt["movies"], 3);
    assert_eq!(rebuilt["fingerprint"].as_str().unwrap().len(), 64);

    let response = server
        .get("/recommendations")
        .add_query_param("title", "Inception")
        .add_query_param("k", 2)
        .await;
    let body: serde_json::Value = response.json();
    let titles: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Interstellar", "Titanic"]);
}

#[tokio::test]
async fn test_rebuild_with_misaligned_ratings_keeps_old_index() {
    let server = create_test_server();

    let response = server
        .post("/catalog")
        .json(&json!({
            "movies": [
                {"id": 1, "title": "Heat", "genre_tags": ["Crime"]},
                {"id": 2, "title": "Ronin", "genre_tags": ["Crime"]}
            ],
            "ratings": {"raters": 1, "movies": 3, "cells": [1, 2, 3]}
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);

    let response = server.get("/movies").await;
    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 7);
}

#[tokio::test]
async fn test_rebuild_with_overflowing_ratings_is_rejected() {
    let server = create_test_server();

    let response = server
        .post("/catalog")
        .json(&json!({
            "movies": [{"id": 1, "title": "Heat", "genre_tags": ["Crime"]}],
            "ratings": {"raters": 9223372036854775808u64, "movies": 2, "cells": []}
        }))
        .await;
    assert!(response.status_code().is_client_error());

    let response = server.get("/movies").await;
    let movies: Vec<serde_json::Value> = response.json();
    assert_eq!(movies.len(), 7);
}

#[tokio::test]
async fn test_rebuild_with_empty_catalog_is_rejected() {
    let server = create_test_server();

    let response = server.post("/catalog").json(&json!({ "movies": [] })).await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}
