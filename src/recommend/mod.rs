// Content-based recommendations — TF-IDF corpus, user profile, cosine
// ranking, persistence, and the substring fallback.

pub mod corpus;
pub mod fallback;
pub mod profile;
pub mod ranker;
pub mod store;

pub use store::{RecommendSettings, RecommendationStore, RefreshOutcome};
