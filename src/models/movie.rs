use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Unique, stable identifier of a movie in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie record as loaded into the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub genre_tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub poster_reference: String,
}

impl Movie {
    /// Creates a new movie
    pub fn new(
        id: u64,
        title: impl Into<String>,
        genre_tags: &[&str],
        keywords: &[&str],
        poster_reference: impl Into<String>,
    ) -> Self {
        Self {
            id: MovieId(id),
            title: title.into(),
            genre_tags: genre_tags.iter().map(|g| g.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            poster_reference: poster_reference.into(),
        }
    }

    /// Genre tags followed by keywords, space separated
    pub fn tags(&self) -> String {
        self.genre_tags
            .iter()
            .chain(self.keywords.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_any_genre(&self, genres: &[String]) -> bool {
        genres
            .iter()
            .any(|wanted| self.genre_tags.iter().any(|g| g.eq_ignore_ascii_case(wanted)))
    }
}

/// How a caller names the movie a query is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieRef {
    Id(MovieId),
    /// Exact title; the first catalog entry wins when titles repeat
    Title(String),
}

impl Display for MovieRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieRef::Id(id) => write!(f, "id {}", id),
            MovieRef::Title(title) => write!(f, "\"{}\"", title),
        }
    }
}
