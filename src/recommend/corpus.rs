// TF-IDF feature space over location descriptions.
//
// The vectorizer is fit once over every location description and can then
// project arbitrary text (a user's liked descriptions) into the same space
// without refitting. Weighting follows the common smoothed TF-IDF recipe:
//
//   idf(t)   = ln((1 + n) / (1 + df(t))) + 1
//   value    = count(t, doc) * idf(t), then the row is L2-normalized
//
// When the corpus has more distinct terms than `max_features`, only the terms
// with the highest corpus-wide counts are kept.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::db::models::Location;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 2000;

/// Tokens are runs of two or more Unicode word characters.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Knobs for fitting the vectorizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerParams {
    /// Maximum vocabulary size.
    pub max_features: usize,
    /// Drop English stop words before counting.
    pub stop_words: bool,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: false,
        }
    }
}

/// A fitted TF-IDF vectorizer with a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// term → column index
    vocabulary: HashMap<String, usize>,
    /// column index → term (alphabetical)
    terms: Vec<String>,
    /// IDF weight per column
    idf: Vec<f64>,
    stop_words: HashSet<String>,
}

impl TfIdfVectorizer {
    /// Fit a vocabulary and IDF weights over `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], params: &VectorizerParams) -> Self {
        let stop_words: HashSet<String> = if params.stop_words {
            get(LANGUAGE::English).into_iter().collect()
        } else {
            HashSet::new()
        };

        let mut term_counts: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = tokenize(&stop_words, doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut terms: Vec<String> = term_counts.keys().cloned().collect();
        if terms.len() > params.max_features {
            terms.sort_by(|a, b| term_counts[b].cmp(&term_counts[a]).then_with(|| a.cmp(b)));
            terms.truncate(params.max_features);
        }
        terms.sort();

        let n = documents.len() as f64;
        let idf: Vec<f64> = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        debug!(
            documents = documents.len(),
            distinct_terms = term_counts.len(),
            vocabulary = terms.len(),
            "Fitted TF-IDF vocabulary"
        );

        Self {
            vocabulary,
            terms,
            idf,
            stop_words,
        }
    }

    /// Number of columns in the feature space.
    pub fn dimensions(&self) -> usize {
        self.terms.len()
    }

    /// The vocabulary in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column index of a term, if it made it into the vocabulary.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Project one text into the fitted space. Unknown terms are ignored.
    /// Returns an empty vector when the vocabulary is empty.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        if self.terms.is_empty() {
            return Vec::new();
        }

        let mut vector = vec![0.0_f64; self.terms.len()];
        for token in tokenize(&self.stop_words, text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                vector[idx] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        l2_normalize(&mut vector);
        vector
    }

    /// Project many texts.
    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<f64>> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}

/// The fitted feature space plus one row per location.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub vectorizer: TfIdfVectorizer,
    /// Row `i` is the feature vector of `ids[i]`.
    pub matrix: Vec<Vec<f64>>,
    pub ids: Vec<i64>,
}

impl Corpus {
    /// True when there is nothing to rank.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() || self.vectorizer.dimensions() == 0
    }
}

/// Fit the shared feature space over every location description.
///
/// Corpus order is the order of `locations` (callers pass them by id).
pub fn build_corpus(locations: &[Location], params: &VectorizerParams) -> Corpus {
    let descriptions: Vec<&str> = locations.iter().map(|l| l.description.as_str()).collect();
    let vectorizer = TfIdfVectorizer::fit(&descriptions, params);
    let matrix = vectorizer.transform_batch(&descriptions);
    let ids = locations.iter().map(|l| l.id).collect();

    Corpus {
        vectorizer,
        matrix,
        ids,
    }
}

fn tokenize(stop_words: &HashSet<String>, text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .filter(|t| !stop_words.contains(t))
        .collect()
}

fn l2_normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(id: i64, description: &str) -> Location {
        Location {
            id,
            name: None,
            zone: None,
            state: None,
            city: None,
            entry_price: 0,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let v = TfIdfVectorizer::fit(&["trek mountain", "beach resort"], &VectorizerParams::default());
        assert_eq!(v.terms(), &["beach", "mountain", "resort", "trek"]);
        assert_eq!(v.column("resort"), Some(2));
    }

    #[test]
    fn test_single_character_tokens_dropped() {
        let v = TfIdfVectorizer::fit(&["a b lake"], &VectorizerParams::default());
        assert_eq!(v.terms(), &["lake"]);
    }

    #[test]
    fn test_tokens_lowercased() {
        let v = TfIdfVectorizer::fit(&["Beach BEACH beach"], &VectorizerParams::default());
        assert_eq!(v.dimensions(), 1);
    }

    #[test]
    fn test_accented_words_stay_whole() {
        let v = TfIdfVectorizer::fit(&["Café Über", "ñandú park"], &VectorizerParams::default());
        assert_eq!(v.terms(), &["café", "park", "ñandú", "über"]);
    }

    #[test]
    fn test_devanagari_descriptions_have_vocabulary() {
        let corpus = build_corpus(
            &[loc(1, "मंदिर किला"), loc(2, "मंदिर"), loc(3, "झील")],
            &VectorizerParams::default(),
        );
        assert!(!corpus.is_empty());
        assert_eq!(corpus.vectorizer.dimensions(), 3);
        assert!(corpus.vectorizer.column("मंदिर").is_some());
        assert!(corpus.vectorizer.column("किला").is_some());
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["fort fort fort", "fort temple", "temple beach", "lake"];
        let params = VectorizerParams {
            max_features: 2,
            stop_words: false,
        };
        let v = TfIdfVectorizer::fit(&docs, &params);
        assert_eq!(v.terms(), &["fort", "temple"]);
    }

    #[test]
    fn test_max_features_ties_break_alphabetically() {
        let params = VectorizerParams {
            max_features: 1,
            stop_words: false,
        };
        let v = TfIdfVectorizer::fit(&["zoo", "aquarium"], &params);
        assert_eq!(v.terms(), &["aquarium"]);
    }

    #[test]
    fn test_stop_words_optional() {
        let docs = ["the fort and the palace"];
        let plain = TfIdfVectorizer::fit(&docs, &VectorizerParams::default());
        assert!(plain.column("the").is_some());

        let filtered = TfIdfVectorizer::fit(
            &docs,
            &VectorizerParams {
                stop_words: true,
                ..Default::default()
            },
        );
        assert!(filtered.column("the").is_none());
        assert!(filtered.column("fort").is_some());
    }

    #[test]
    fn test_smoothed_idf_weights() {
        // "beach" in 2 of 3 docs, "trek" in 1 of 3.
        let v = TfIdfVectorizer::fit(
            &["beach", "beach", "trek"],
            &VectorizerParams::default(),
        );
        let beach = v.idf[v.column("beach").unwrap()];
        let trek = v.idf[v.column("trek").unwrap()];
        assert!((beach - ((4.0_f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((trek - (2.0_f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_rows_are_unit_length() {
        let v = TfIdfVectorizer::fit(
            &["beach resort", "mountain trek"],
            &VectorizerParams::default(),
        );
        let row = v.transform("beach resort resort");
        let norm: f64 = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_unknown_terms_is_zero() {
        let v = TfIdfVectorizer::fit(&["beach resort"], &VectorizerParams::default());
        let row = v.transform("desert safari");
        assert_eq!(row.len(), v.dimensions());
        assert!(row.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_empty_vocabulary_transforms_to_empty() {
        let v = TfIdfVectorizer::fit::<&str>(&[], &VectorizerParams::default());
        assert_eq!(v.dimensions(), 0);
        assert!(v.transform("beach").is_empty());
    }

    #[test]
    fn test_build_corpus_aligns_ids() {
        let corpus = build_corpus(
            &[loc(7, "beach resort"), loc(3, "mountain trek")],
            &VectorizerParams::default(),
        );
        assert_eq!(corpus.ids, vec![7, 3]);
        assert_eq!(corpus.matrix.len(), 2);
        assert_eq!(corpus.matrix[0].len(), corpus.vectorizer.dimensions());
        assert!(!corpus.is_empty());
    }

    #[test]
    fn test_build_corpus_empty() {
        let corpus = build_corpus(&[], &VectorizerParams::default());
        assert!(corpus.is_empty());
        assert!(corpus.ids.is_empty());
        assert!(corpus.matrix.is_empty());
    }

    #[test]
    fn test_build_corpus_blank_descriptions() {
        let corpus = build_corpus(&[loc(1, ""), loc(2, "  ")], &VectorizerParams::default());
        assert!(corpus.is_empty());
        assert_eq!(corpus.ids, vec![1, 2]);
    }
}
