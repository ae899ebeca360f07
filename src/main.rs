use cinematch::api::{create_router, AppState};
use cinematch::config::Config;
use cinematch::models::{Catalog, RatingMatrix};
use cinematch::services::{IndexHandle, SimilarityIndex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Raters in the simulated preference data used when no rating file is given
const SIMULATED_RATERS: usize = 5;
const SIMULATED_SEED: u64 = 42;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let recommender = config.recommender()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)?,
        None => {
            tracing::info!("No CATALOG_PATH set, using the sample catalog");
            Catalog::sample()
        }
    };
    let ratings = match &config.ratings_path {
        Some(path) => RatingMatrix::from_json_file(path)?,
        None => {
            tracing::info!(
                raters = SIMULATED_RATERS,
                seed = SIMULATED_SEED,
                "No RATINGS_PATH set, simulating ratings"
            );
            RatingMatrix::simulated(SIMULATED_RATERS, catalog.len(), SIMULATED_SEED)
        }
    };

    let index = SimilarityIndex::build_with_snapshot(
        catalog,
        &ratings,
        &recommender,
        config.snapshot_path.as_deref(),
    )?;
    let state = AppState::new(IndexHandle::new(
        index,
        recommender,
        config.snapshot_path.clone(),
    ));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
