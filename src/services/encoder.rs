//! Term-frequency encoding of movie tag text.
//!
//! Each movie's genre tags and keywords are joined into one tag field,
//! tokenized, and counted against a shared vocabulary. The vocabulary keeps the
//! `max_features` most frequent non-stopword terms of the whole catalog.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::Catalog;

/// Common English words excluded from the vocabulary
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Lowercased word tokens of at least two characters
///
/// Anything that is not alphanumeric or `_` separates tokens, so `Sci-Fi`
/// yields `sci` and `fi`.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// Frozen term → column mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    columns: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_terms(terms: Vec<String>) -> Self {
        let columns = terms
            .iter()
            .enumerate()
            .map(|(column, term)| (term.clone(), column))
            .collect();
        Self { terms, columns }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn column(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }

    /// Terms in column order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Counts vocabulary terms in `text`; unknown terms are ignored
    pub fn encode(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.terms.len()];
        for token in tokenize(text) {
            if let Some(column) = self.column(&token) {
                vector[column] += 1.0;
            }
        }
        vector
    }
}

/// Vocabulary plus one term-frequency vector per catalog movie
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCatalog {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<Vec<f64>>,
}

pub struct FeatureEncoder<'a> {
    max_features: usize,
    stopwords: &'a BTreeSet<String>,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(max_features: usize, stopwords: &'a BTreeSet<String>) -> Self {
        Self {
            max_features,
            stopwords,
        }
    }

    /// Builds the vocabulary and encodes every movie
    ///
    /// An empty catalog yields an empty vocabulary and no vectors.
    pub fn encode(&self, catalog: &Catalog) -> EncodedCatalog {
        let documents: Vec<String> = catalog.movies().iter().map(|m| m.tags()).collect();
        let vocabulary = self.build_vocabulary(&documents);
        let vectors = documents.iter().map(|doc| vocabulary.encode(doc)).collect();

        tracing::debug!(
            movies = documents.len(),
            vocabulary = vocabulary.len(),
            "Encoded catalog tags"
        );

        EncodedCatalog {
            vocabulary,
            vectors,
        }
    }

    fn build_vocabulary(&self, documents: &[String]) -> Vocabulary {
        // term -> (corpus count, first appearance)
        let mut stats: HashMap<String, (usize, usize)> = HashMap::new();
        let mut position = 0;
        for document in documents {
            for token in tokenize(document) {
                if self.stopwords.contains(&token) {
                    continue;
                }
                stats.entry(token).or_insert((0, position)).0 += 1;
                position += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = stats
            .into_iter()
            .map(|(term, (count, first))| (term, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(self.max_features);

        // columns follow first appearance
        ranked.sort_by_key(|(_, _, first)| *first);
        Vocabulary::from_terms(ranked.into_iter().map(|(term, _, _)| term).collect())
    }
}
