// Engine tests — like → refresh → read flows against an in-memory SQLite
// database.
//
// These exercise LikeRegistry and RecommendationStore through the public
// library API, the same way the CLI and the web handlers drive them.

use std::collections::HashSet;
use std::sync::Arc;

use wayfarer::db::models::{NewLocation, UserId};
use wayfarer::db::{self, Database};
use wayfarer::error::EngineError;
use wayfarer::likes::LikeRegistry;
use wayfarer::recommend::{RecommendSettings, RefreshOutcome};

async fn setup(descriptions: &[&str]) -> (Arc<dyn Database>, LikeRegistry, Vec<i64>) {
    let db = db::open_in_memory().unwrap();
    let mut ids = Vec::new();
    for (i, description) in descriptions.iter().enumerate() {
        let id = db
            .insert_location(&NewLocation {
                name: Some(format!("Place {}", i + 1)),
                description: description.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        ids.push(id);
    }
    let registry = LikeRegistry::new(db.clone(), RecommendSettings::default());
    (db, registry, ids)
}

fn ids_of(locations: &[wayfarer::db::models::Location]) -> Vec<i64> {
    locations.iter().map(|l| l.id).collect()
}

// ============================================================
// Reference examples
// ============================================================

#[tokio::test]
async fn beach_example_ranks_identical_description_first() {
    let (_db, registry, ids) = setup(&["beach resort", "beach resort", "mountain trek"]).await;
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let user = UserId::new("alice");

    let outcome = registry.toggle(&user, a).await.unwrap();
    assert!(outcome.liked);

    let recommended = registry.store().read(&user).await.unwrap();
    assert_eq!(ids_of(&recommended), vec![b, c]);
}

#[tokio::test]
async fn no_likes_gives_empty_result_and_no_row() {
    let (db, registry, _ids) = setup(&["beach resort", "mountain trek"]).await;
    let user = UserId::new("nobody");

    let recommended = registry.store().read(&user).await.unwrap();
    assert!(recommended.is_empty());

    let outcome = registry.store().refresh(&user).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Cleared);
    assert!(db.get_recommendation(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn fallback_used_when_no_recommendation_stored() {
    let (db, _registry, ids) = setup(&["lake view", "scenic lake view", "desert dunes"]).await;
    let user = UserId::new("alice");

    // Like directly through storage so no refresh runs.
    db.create_liked(&user, ids[0], None).await.unwrap();
    assert!(db.get_recommendation(&user).await.unwrap().is_none());

    let registry = LikeRegistry::new(db.clone(), RecommendSettings::default());
    let recommended = registry.store().read(&user).await.unwrap();
    assert_eq!(ids_of(&recommended), vec![ids[1]]);
}

#[tokio::test]
async fn stored_recommendation_wins_over_fallback() {
    let (_db, registry, ids) = setup(&["lake view", "scenic lake view", "desert dunes"]).await;
    let user = UserId::new("alice");

    registry.toggle(&user, ids[0]).await.unwrap();

    // The ranked set includes "desert dunes", which the substring fallback
    // would never return.
    let recommended = registry.store().read(&user).await.unwrap();
    assert_eq!(ids_of(&recommended), vec![ids[1], ids[2]]);
}

// ============================================================
// Toggle / like semantics
// ============================================================

#[tokio::test]
async fn toggle_likes_then_unlikes() {
    let (db, registry, ids) = setup(&["beach resort", "beach hut", "mountain trek"]).await;
    let user = UserId::new("alice");

    let first = registry.toggle(&user, ids[0]).await.unwrap();
    assert!(first.liked);
    assert!(registry.is_liked(&user, ids[0]).await.unwrap());
    assert!(db.get_recommendation(&user).await.unwrap().is_some());

    let second = registry.toggle(&user, ids[0]).await.unwrap();
    assert!(!second.liked);
    assert!(!registry.is_liked(&user, ids[0]).await.unwrap());

    // Last like removed: the refresh cleared the stored recommendation.
    assert!(db.get_recommendation(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn toggle_unknown_location_is_not_found() {
    let (db, registry, _ids) = setup(&["beach resort"]).await;
    let user = UserId::new("alice");

    let err = registry.toggle(&user, 999).await.unwrap_err();
    assert!(matches!(err, EngineError::LocationNotFound(999)));
    assert!(db.list_liked(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_like_is_reported_without_mutation() {
    let (db, registry, ids) = setup(&["beach resort", "beach hut", "mountain trek"]).await;
    let user = UserId::new("alice");

    let liked = registry.like(&user, ids[0]).await.unwrap();
    assert_eq!(liked.description, "beach resort");
    let before = db.get_recommendation(&user).await.unwrap().unwrap();

    let err = registry.like(&user, ids[0]).await.unwrap_err();
    assert!(matches!(err, EngineError::DuplicateLike { location_id, .. } if location_id == ids[0]));

    assert_eq!(db.list_liked(&user).await.unwrap().len(), 1);
    let after = db.get_recommendation(&user).await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn like_unknown_location_is_not_found() {
    let (_db, registry, _ids) = setup(&["beach resort"]).await;
    let err = registry.like(&UserId::new("alice"), 42).await.unwrap_err();
    assert!(matches!(err, EngineError::LocationNotFound(42)));
}

#[tokio::test]
async fn liked_locations_in_like_order() {
    let (_db, registry, ids) = setup(&["beach", "fort", "temple"]).await;
    let user = UserId::new("alice");

    registry.toggle(&user, ids[2]).await.unwrap();
    registry.toggle(&user, ids[0]).await.unwrap();

    let liked = registry.liked_locations(&user).await.unwrap();
    let liked_ids: Vec<i64> = liked.iter().map(|l| l.location.id).collect();
    assert_eq!(liked_ids, vec![ids[2], ids[0]]);
}

// ============================================================
// Store invariants
// ============================================================

#[tokio::test]
async fn refresh_is_idempotent() {
    let (db, registry, ids) = setup(&[
        "beach resort",
        "beach hut",
        "mountain trek",
        "lake view",
        "beach lake",
    ])
    .await;
    let user = UserId::new("alice");
    db.create_liked(&user, ids[0], None).await.unwrap();
    db.create_liked(&user, ids[3], None).await.unwrap();

    let first = registry.store().refresh(&user).await.unwrap();
    let stored_first = db.get_recommendation(&user).await.unwrap().unwrap();
    let second = registry.store().refresh(&user).await.unwrap();
    let stored_second = db.get_recommendation(&user).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(stored_first.location_ids(), stored_second.location_ids());
}

#[tokio::test]
async fn recommendations_never_include_liked_locations() {
    let descriptions = [
        "beach resort",
        "beach hut",
        "beach resort spa",
        "mountain trek",
        "mountain lake",
        "city fort",
    ];
    let (_db, registry, ids) = setup(&descriptions).await;
    let user = UserId::new("alice");

    for &id in &ids[..3] {
        registry.toggle(&user, id).await.unwrap();
        let liked: HashSet<i64> = registry
            .liked_locations(&user)
            .await
            .unwrap()
            .iter()
            .map(|l| l.location.id)
            .collect();
        let recommended = registry.store().read(&user).await.unwrap();
        assert!(recommended.iter().all(|l| !liked.contains(&l.id)));
    }
}

#[tokio::test]
async fn recommendations_capped_at_top_k() {
    let descriptions: Vec<String> = (0..15).map(|i| format!("beach spot{i}")).collect();
    let refs: Vec<&str> = descriptions.iter().map(|s| s.as_str()).collect();
    let (_db, registry, ids) = setup(&refs).await;
    let user = UserId::new("alice");

    registry.toggle(&user, ids[0]).await.unwrap();
    let recommended = registry.store().read(&user).await.unwrap();
    assert_eq!(recommended.len(), 10);
}

#[tokio::test]
async fn custom_top_k_respected() {
    let (db, _registry, ids) = setup(&["beach a1", "beach b2", "beach c3", "beach d4"]).await;
    let settings = RecommendSettings {
        top_k: 2,
        ..Default::default()
    };
    let registry = LikeRegistry::new(db, settings);
    let user = UserId::new("alice");

    registry.toggle(&user, ids[0]).await.unwrap();
    assert_eq!(registry.store().read(&user).await.unwrap().len(), 2);
}

#[tokio::test]
async fn users_do_not_affect_each_other() {
    let (db, registry, ids) = setup(&["beach resort", "beach hut", "mountain trek", "mountain hut"]).await;
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    registry.toggle(&alice, ids[0]).await.unwrap();
    registry.toggle(&bob, ids[2]).await.unwrap();

    let alice_recs = registry.store().read(&alice).await.unwrap();
    let bob_recs = registry.store().read(&bob).await.unwrap();
    assert_eq!(alice_recs[0].id, ids[1]);
    assert_eq!(bob_recs[0].id, ids[3]);

    registry.toggle(&alice, ids[0]).await.unwrap();
    assert!(db.get_recommendation(&alice).await.unwrap().is_none());
    assert!(db.get_recommendation(&bob).await.unwrap().is_some());
}

#[tokio::test]
async fn liking_everything_falls_back_to_empty() {
    let (db, registry, ids) = setup(&["beach resort", "mountain trek"]).await;
    let user = UserId::new("alice");

    registry.toggle(&user, ids[0]).await.unwrap();
    registry.toggle(&user, ids[1]).await.unwrap();

    // Nothing left to recommend: the stored set is empty, so read falls
    // back, and the fallback excludes liked locations too.
    let stored = db.get_recommendation(&user).await.unwrap().unwrap();
    assert!(stored.locations.is_empty());
    assert!(registry.store().read(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn blank_descriptions_clear_recommendations() {
    let (db, registry, ids) = setup(&["", "a"]).await;
    let user = UserId::new("alice");

    let outcome = registry.toggle(&user, ids[0]).await.unwrap();
    assert!(outcome.liked);
    assert!(db.get_recommendation(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn non_ascii_descriptions_get_ranked() {
    let (_db, registry, ids) = setup(&["मंदिर किला", "मंदिर", "झील", "café über"]).await;
    let user = UserId::new("alice");

    registry.toggle(&user, ids[0]).await.unwrap();
    let outcome = registry.store().refresh(&user).await.unwrap();
    assert_eq!(outcome, RefreshOutcome::Stored(vec![ids[1], ids[2], ids[3]]));
}
