// User profile — the mean of the user's liked descriptions in TF-IDF space.

use tracing::debug;

use super::corpus::TfIdfVectorizer;

/// Build a user's profile vector from the descriptions of their liked
/// locations.
///
/// Every liked description weighs the same. Returns `None` when there is
/// nothing to average (no likes, or an empty vocabulary).
pub fn build_profile<S: AsRef<str>>(
    vectorizer: &TfIdfVectorizer,
    liked_texts: &[S],
) -> Option<Vec<f64>> {
    if liked_texts.is_empty() || vectorizer.dimensions() == 0 {
        return None;
    }

    let rows = vectorizer.transform_batch(liked_texts);
    let profile = mean_vector(&rows, vectorizer.dimensions());

    debug!(
        liked = liked_texts.len(),
        dimensions = profile.len(),
        "Built user profile vector"
    );
    Some(profile)
}

/// Element-wise mean of equally sized vectors.
pub fn mean_vector(rows: &[Vec<f64>], dimensions: usize) -> Vec<f64> {
    let mut mean = vec![0.0_f64; dimensions];
    if rows.is_empty() {
        return mean;
    }

    for row in rows {
        for (acc, value) in mean.iter_mut().zip(row) {
            *acc += value;
        }
    }

    let n = rows.len() as f64;
    for value in &mut mean {
        *value /= n;
    }
    mean
}
