// Recommendation store — recompute, persist and read a user's
// recommendations.
//
// `refresh` runs the whole pipeline (corpus → profile → ranker) and replaces
// the stored set in one transaction. `read` returns the stored set, or the
// substring fallback when there isn't one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use super::corpus::{build_corpus, VectorizerParams};
use super::fallback::{fallback_search, DEFAULT_FALLBACK_LIMIT};
use super::profile::build_profile;
use super::ranker::{rank, DEFAULT_TOP_K};
use crate::db::models::{Location, UserId};
use crate::db::Database;
use crate::error::EngineResult;

/// Tuning for the recommendation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendSettings {
    /// How many ranked locations to store per user.
    pub top_k: usize,
    /// Cap on fallback search results.
    pub fallback_limit: usize,
    pub vectorizer: VectorizerParams,
}

impl Default for RecommendSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            fallback_limit: DEFAULT_FALLBACK_LIMIT,
            vectorizer: VectorizerParams::default(),
        }
    }
}

/// What a refresh did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A recommendation was stored with these location ids, best first.
    Stored(Vec<i64>),
    /// Not enough data: any stored recommendation was removed.
    Cleared,
}

#[derive(Clone)]
pub struct RecommendationStore {
    db: Arc<dyn Database>,
    settings: RecommendSettings,
}

impl RecommendationStore {
    pub fn new(db: Arc<dyn Database>, settings: RecommendSettings) -> Self {
        Self { db, settings }
    }

    pub fn settings(&self) -> &RecommendSettings {
        &self.settings
    }

    /// Recompute the user's recommendations and replace the stored set.
    ///
    /// Calling this twice with unchanged likes and locations stores the
    /// same set both times.
    pub async fn refresh(&self, user: &UserId) -> EngineResult<RefreshOutcome> {
        let liked = self.db.list_liked(user).await?;
        if liked.is_empty() {
            return self.clear(user, "no likes").await;
        }

        let locations = self.db.list_locations().await?;
        let corpus = build_corpus(&locations, &self.settings.vectorizer);
        if corpus.is_empty() {
            return self.clear(user, "empty corpus").await;
        }

        // Profile from the liked locations' current descriptions; the like's
        // own snapshot only stands in if the location row is gone.
        let current: HashMap<i64, &str> = locations
            .iter()
            .map(|l| (l.id, l.description.as_str()))
            .collect();
        let liked_texts: Vec<&str> = liked
            .iter()
            .map(|lk| {
                current
                    .get(&lk.location_id)
                    .copied()
                    .unwrap_or(lk.description.as_str())
            })
            .collect();

        let Some(profile) = build_profile(&corpus.vectorizer, &liked_texts) else {
            return self.clear(user, "empty profile").await;
        };

        let liked_ids: HashSet<i64> = liked.iter().map(|lk| lk.location_id).collect();
        let ranked = rank(&profile, &corpus, &liked_ids, self.settings.top_k);
        let ids: Vec<i64> = ranked.iter().map(|c| c.location_id).collect();

        if let Some(best) = ranked.first() {
            debug!(
                user = %user,
                location_id = best.location_id,
                score = best.score,
                "Top recommendation"
            );
        }

        self.db.replace_recommendation(user, &ids).await?;
        info!(
            user = %user,
            liked = liked.len(),
            recommended = ids.len(),
            "Stored recommendations"
        );

        Ok(RefreshOutcome::Stored(ids))
    }

    /// The user's recommended locations, best first.
    ///
    /// Falls back to substring search over the liked descriptions when no
    /// recommendation is stored or the stored one is empty.
    pub async fn read(&self, user: &UserId) -> EngineResult<Vec<Location>> {
        if let Some(recommendation) = self.db.get_recommendation(user).await? {
            if !recommendation.locations.is_empty() {
                return Ok(recommendation.locations);
            }
        }

        self.fallback(user).await
    }

    /// Substring-based fallback over all locations.
    pub async fn fallback(&self, user: &UserId) -> EngineResult<Vec<Location>> {
        let liked = self.db.list_liked(user).await?;
        if liked.is_empty() {
            return Ok(Vec::new());
        }

        let locations = self.db.list_locations().await?;
        let liked_ids: HashSet<i64> = liked.iter().map(|lk| lk.location_id).collect();
        let queries: Vec<&str> = locations
            .iter()
            .filter(|l| liked_ids.contains(&l.id))
            .map(|l| l.description.as_str())
            .collect();

        let found = fallback_search(
            &locations,
            &liked_ids,
            &queries,
            self.settings.fallback_limit,
        );
        debug!(user = %user, found = found.len(), "Fallback search");
        Ok(found)
    }

    async fn clear(&self, user: &UserId, reason: &str) -> EngineResult<RefreshOutcome> {
        let removed = self.db.delete_recommendation(user).await?;
        info!(user = %user, reason, removed, "Cleared recommendations");
        Ok(RefreshOutcome::Cleared)
    }
}
