use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::encoder::ENGLISH_STOPWORDS;

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON catalog file; the built-in sample catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// JSON rating matrix file; seeded simulated ratings are used when unset
    #[serde(default)]
    pub ratings_path: Option<PathBuf>,

    /// Similarity snapshot file; snapshots are disabled when unset
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Vocabulary cap
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Extra stopwords on top of the built-in English list
    #[serde(default)]
    pub stopwords: Vec<String>,

    /// Share of the hybrid score taken from tag similarity
    #[serde(default = "default_weight")]
    pub content_weight: f64,

    /// Share of the hybrid score taken from rating similarity
    #[serde(default = "default_weight")]
    pub preference_weight: f64,

    /// Result count used when a query does not specify one
    #[serde(default = "default_k")]
    pub default_k: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_features() -> usize {
    5000
}

fn default_weight() -> f64 {
    0.5
}

fn default_k() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Builds the validated recommender settings
    pub fn recommender(&self) -> AppResult<RecommenderConfig> {
        let mut stopwords: BTreeSet<String> =
            ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect();
        stopwords.extend(
            self.stopwords
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );

        let config = RecommenderConfig {
            max_features: self.max_features,
            stopwords,
            fusion_weights: FusionWeights {
                content: self.content_weight,
                preference: self.preference_weight,
            },
            default_k: self.default_k,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Relative weight of each similarity signal in the hybrid score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub content: f64,
    pub preference: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            content: 0.5,
            preference: 0.5,
        }
    }
}

impl FusionWeights {
    pub fn validate(&self) -> AppResult<()> {
        if !self.content.is_finite() || !self.preference.is_finite() {
            return Err(AppError::InvalidConfig(
                "fusion weights must be finite".to_string(),
            ));
        }
        if self.content < 0.0 || self.preference < 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "fusion weights must be non-negative (content={}, preference={})",
                self.content, self.preference
            )));
        }
        if (self.content + self.preference - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AppError::InvalidConfig(format!(
                "fusion weights must sum to 1 (content={}, preference={})",
                self.content, self.preference
            )));
        }
        Ok(())
    }
}

/// Settings that shape a built similarity index
///
/// Serialized as part of the index fingerprint, so any change here marks
/// previously persisted snapshots as stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub max_features: usize,
    pub stopwords: BTreeSet<String>,
    pub fusion_weights: FusionWeights,
    pub default_k: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            stopwords: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            fusion_weights: FusionWeights::default(),
            default_k: default_k(),
        }
    }
}

impl RecommenderConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.max_features == 0 {
            return Err(AppError::InvalidConfig(
                "max_features must be greater than 0".to_string(),
            ));
        }
        if self.default_k == 0 {
            return Err(AppError::InvalidConfig(
                "default k must be greater than 0".to_string(),
            ));
        }
        self.fusion_weights.validate()
    }
}
