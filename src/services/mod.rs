pub mod encoder;
pub mod fusion;
pub mod handle;
pub mod recommender;
pub mod similarity;
pub mod snapshot;

pub use encoder::{FeatureEncoder, Vocabulary};
pub use handle::IndexHandle;
pub use recommender::{Recommendation, SimilarityIndex};
pub use similarity::SimilarityMatrix;
