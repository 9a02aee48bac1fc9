// Fallback search — a crude substring match used only when a user has no
// computed recommendation.
//
// Each liked description is a query. A location matches when its
// description contains any query, case-insensitively. Liked locations are
// excluded and the result is cut to `limit`, in corpus order.

use std::collections::HashSet;

use crate::db::models::Location;

/// Default cap on fallback results.
pub const DEFAULT_FALLBACK_LIMIT: usize = 10;

pub fn fallback_search<S: AsRef<str>>(
    locations: &[Location],
    liked_ids: &HashSet<i64>,
    queries: &[S],
    limit: usize,
) -> Vec<Location> {
    if queries.is_empty() {
        return Vec::new();
    }

    let queries: Vec<String> = queries.iter().map(|q| q.as_ref().to_lowercase()).collect();

    locations
        .iter()
        .filter(|l| !liked_ids.contains(&l.id))
        .filter(|l| {
            let description = l.description.to_lowercase();
            queries.iter().any(|q| description.contains(q.as_str()))
        })
        .take(limit)
        .cloned()
        .collect()
}
