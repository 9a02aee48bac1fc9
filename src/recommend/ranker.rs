// Ranking — cosine similarity between the profile and every location.
//
// Scores are sorted descending with a stable sort, so ties keep corpus
// order. Liked locations are dropped after sorting, then the list is cut
// to top-K.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::corpus::Corpus;

/// Default number of recommendations kept per user.
pub const DEFAULT_TOP_K: usize = 10;

/// A ranked location and its similarity to the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub location_id: i64,
    pub score: f64,
}

/// Cosine similarity between two vectors, in [-1, 1].
///
/// Mismatched lengths, empty vectors and zero vectors score 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Rank every corpus location against `profile`.
///
/// Returns at most `top_k` candidates, best first, never including an id
/// from `liked`. An empty corpus or empty profile gives an empty list.
pub fn rank(profile: &[f64], corpus: &Corpus, liked: &HashSet<i64>, top_k: usize) -> Vec<Candidate> {
    if profile.is_empty() || corpus.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Candidate> = corpus
        .ids
        .iter()
        .zip(&corpus.matrix)
        .map(|(&location_id, row)| Candidate {
            location_id,
            score: cosine_similarity(profile, row),
        })
        .collect();

    // sort_by is stable: equal scores stay in corpus order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    scored
        .into_iter()
        .filter(|c| !liked.contains(&c.location_id))
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Location;
    use crate::recommend::corpus::{build_corpus, VectorizerParams};

    fn corpus(descriptions: &[&str]) -> Corpus {
        let locations: Vec<Location> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| Location {
                id: i as i64 + 1,
                name: None,
                zone: None,
                state: None,
                city: None,
                entry_price: 0,
                description: d.to_string(),
            })
            .collect();
        build_corpus(&locations, &VectorizerParams::default())
    }

    fn ids(candidates: &[Candidate]) -> Vec<i64> {
        candidates.iter().map(|c| c.location_id).collect()
    }

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_zero_and_mismatched() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_rank_beach_example() {
        let c = corpus(&["beach resort", "beach resort", "mountain trek"]);
        let profile = c.vectorizer.transform("beach resort");
        let liked = HashSet::from([1]);
        let ranked = rank(&profile, &c, &liked, DEFAULT_TOP_K);
        assert_eq!(ids(&ranked), vec![2, 3]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_rank_ties_keep_corpus_order() {
        let c = corpus(&["lake", "fort", "temple", "palace"]);
        let profile = c.vectorizer.transform("lake");
        let ranked = rank(&profile, &c, &HashSet::new(), 10);
        // "lake" first, then the zero-score rows in corpus order.
        assert_eq!(ids(&ranked), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_exclusion_does_not_shift_order() {
        let c = corpus(&["lake view", "lake", "fort", "lake view palace"]);
        let profile = c.vectorizer.transform("lake view");
        let all = ids(&rank(&profile, &c, &HashSet::new(), 10));
        let without_two = ids(&rank(&profile, &c, &HashSet::from([2]), 10));
        let expected: Vec<i64> = all.into_iter().filter(|&id| id != 2).collect();
        assert_eq!(without_two, expected);
    }

    #[test]
    fn test_rank_caps_at_top_k() {
        let c = corpus(&["sea a1", "sea b2", "sea c3", "sea d4", "sea e5"]);
        let profile = c.vectorizer.transform("sea");
        assert_eq!(rank(&profile, &c, &HashSet::new(), 3).len(), 3);
        assert_eq!(rank(&profile, &c, &HashSet::from([1, 2, 3]), 3).len(), 2);
    }

    #[test]
    fn test_rank_empty_inputs() {
        let c = corpus(&["beach"]);
        assert!(rank(&[], &c, &HashSet::new(), 10).is_empty());

        let empty = corpus(&[]);
        assert!(rank(&[1.0], &empty, &HashSet::new(), 10).is_empty());
    }
}
