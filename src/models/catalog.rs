use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::Serialize;

use crate::error::{AppError, AppResult};

use super::{Movie, MovieId, MovieRef};

/// Ordered, read-only movie list
///
/// A movie's position here is its row and column in every similarity matrix
/// built from this catalog.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Creates a catalog, rejecting repeated ids and warning on repeated titles
    pub fn new(movies: Vec<Movie>) -> AppResult<Self> {
        let mut ids = HashSet::new();
        let mut titles: HashMap<&str, usize> = HashMap::new();

        for (index, movie) in movies.iter().enumerate() {
            if !ids.insert(movie.id) {
                return Err(AppError::InvalidInput(format!(
                    "duplicate movie id {} at position {}",
                    movie.id, index
                )));
            }
            if let Some(first) = titles.get(movie.title.as_str()) {
                tracing::warn!(
                    title = %movie.title,
                    first_index = first,
                    duplicate_index = index,
                    "Duplicate title in catalog; title lookups resolve to the first entry"
                );
            } else {
                titles.insert(movie.title.as_str(), index);
            }
        }

        Ok(Self { movies })
    }

    /// Reads a JSON array of movies
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let movies: Vec<Movie> = serde_json::from_str(&raw)?;
        Self::new(movies)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn index_of_id(&self, id: MovieId) -> Option<usize> {
        self.movies.iter().position(|m| m.id == id)
    }

    /// First catalog position whose title matches exactly
    pub fn index_of_title(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    pub fn resolve(&self, movie: &MovieRef) -> AppResult<usize> {
        let index = match movie {
            MovieRef::Id(id) => self.index_of_id(*id),
            MovieRef::Title(title) => self.index_of_title(title),
        };
        index.ok_or_else(|| AppError::NotFound(movie.to_string()))
    }

    /// Distinct genre tags, sorted
    pub fn genres(&self) -> Vec<String> {
        self.movies
            .iter()
            .flat_map(|m| m.genre_tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Movies carrying any of the given genres, in catalog order
    ///
    /// An empty filter returns the whole catalog.
    pub fn by_genre(&self, genres: &[String]) -> Vec<&Movie> {
        if genres.is_empty() {
            return self.movies.iter().collect();
        }
        self.movies.iter().filter(|m| m.has_any_genre(genres)).collect()
    }

    /// Leading movies shown on the landing page
    pub fn trending(&self, limit: usize) -> &[Movie] {
        &self.movies[..limit.min(self.movies.len())]
    }

    /// Seven-movie demo catalog
    pub fn sample() -> Self {
        let movies = vec![
            Movie::new(
                1,
                "Inception",
                &["Action", "Sci-Fi"],
                &["dream", "heist"],
                "https://m.media-amazon.com/images/I/91p3Z4jFJ2L._AC_SL1500_.jpg",
            ),
            Movie::new(
                2,
                "Interstellar",
                &["Adventure", "Sci-Fi"],
                &["space", "travel"],
                "https://m.media-amazon.com/images/I/71n9mXELWzL._AC_SL1500_.jpg",
            ),
            Movie::new(
                3,
                "The Dark Knight",
                &["Action", "Thriller"],
                &["gotham", "hero"],
                "https://m.media-amazon.com/images/I/71P8J4aIutL._AC_SL1500_.jpg",
            ),
            Movie::new(
                4,
                "Avengers",
                &["Action", "Superhero"],
                &["marvel", "heroes"],
                "https://m.media-amazon.com/images/I/81ai6zx6eXL._AC_SL1500_.jpg",
            ),
            Movie::new(
                5,
                "Titanic",
                &["Romance", "Drama"],
                &["love", "ship"],
                "https://m.media-amazon.com/images/I/71rNJQ2g-LL._AC_SY679_.jpg",
            ),
            Movie::new(
                6,
                "Avatar",
                &["Fantasy", "Sci-Fi"],
                &["alien", "world"],
                "https://m.media-amazon.com/images/I/61OUGpUfAyL._AC_SY679_.jpg",
            ),
            Movie::new(
                7,
                "Joker",
                &["Drama", "Crime"],
                &["mental", "illness"],
                "https://m.media-amazon.com/images/I/71niXI3lxlL._AC_SY679_.jpg",
            ),
        ];
        Self { movies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let movies = vec![
            Movie::new(1, "A", &[], &[], ""),
            Movie::new(1, "B", &[], &[], ""),
        ];
        assert!(matches!(Catalog::new(movies), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_title_resolves_to_first() {
        let movies = vec![
            Movie::new(10, "Solaris", &["Drama"], &[], ""),
            Movie::new(11, "Solaris", &["Sci-Fi"], &[], ""),
        ];
        let catalog = Catalog::new(movies).unwrap();
        let index = catalog
            .resolve(&MovieRef::Title("Solaris".to_string()))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(catalog.resolve(&MovieRef::Id(MovieId(11))).unwrap(), 1);
    }

    #[test]
    fn test_unknown_movie_is_not_found() {
        let catalog = Catalog::sample();
        let result = catalog.resolve(&MovieRef::Title("NoSuchMovie".to_string()));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_genres_sorted_and_distinct() {
        let catalog = Catalog::sample();
        let genres = catalog.genres();
        assert_eq!(genres.first().map(String::as_str), Some("Action"));
        assert_eq!(genres.iter().filter(|g| *g == "Sci-Fi").count(), 1);
        assert!(genres.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_by_genre_keeps_catalog_order() {
        let catalog = Catalog::sample();
        let titles: Vec<&str> = catalog
            .by_genre(&["Sci-Fi".to_string()])
            .into_iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Inception", "Interstellar", "Avatar"]);
        assert_eq!(catalog.by_genre(&[]).len(), catalog.len());
    }

    #[test]
    fn test_trending_is_clamped() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.trending(5).len(), 5);
        assert_eq!(catalog.trending(50).len(), 7);
    }

    #[test]
    fn test_from_json_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"id": 1, "title": "Alien", "genre_tags": ["Horror"], "keywords": ["ship"]}]"#,
        )
        .unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.movies()[0].poster_reference, "");
    }
}
