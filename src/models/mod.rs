pub mod catalog;
pub mod movie;
pub mod ratings;

pub use catalog::Catalog;
pub use movie::{Movie, MovieId, MovieRef};
pub use ratings::RatingMatrix;
