//! Tests for the canonical chain registry and location resolver

use liftfuel_common::db::{
    all_location_keys, init_database, resolve_location, ChainRegistry, SENTINEL_CHAIN_ID,
    SENTINEL_CHAIN_NAME, TRACKED_CHAINS,
};
use liftfuel_common::Error;
use sqlx::SqlitePool;

async fn test_pool(dir: &tempfile::TempDir) -> SqlitePool {
    init_database(&dir.path().join("liftfuel.db")).await.unwrap()
}

#[tokio::test]
async fn test_ids_assigned_in_insertion_order() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChainRegistry::new(test_pool(&dir).await);

    registry.ensure_registered(&TRACKED_CHAINS).await.unwrap();

    for (i, name) in TRACKED_CHAINS.iter().enumerate() {
        let identity = registry.lookup(name).await.unwrap().unwrap();
        assert_eq!(identity.id, i as i64 + 1, "unexpected id for '{}'", name);
    }
}

#[tokio::test]
async fn test_ensure_registered_keeps_existing_ids() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChainRegistry::new(test_pool(&dir).await);

    registry.ensure_registered(&["Subway"]).await.unwrap();
    let before = registry.lookup("Subway").await.unwrap().unwrap();

    // Re-registering in a different order must not reassign ids
    registry.ensure_registered(&["Wendy's", "Subway"]).await.unwrap();
    let after = registry.lookup("Subway").await.unwrap().unwrap();

    assert_eq!(before.id, after.id);
}

#[tokio::test]
async fn test_ensure_sentinel_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let pool = test_pool(&dir).await;
    let registry = ChainRegistry::new(pool.clone());

    registry.ensure_sentinel().await.unwrap();
    registry.ensure_sentinel().await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chains WHERE name = ?")
        .bind(SENTINEL_CHAIN_NAME)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let sentinel = registry.lookup(SENTINEL_CHAIN_NAME).await.unwrap().unwrap();
    assert_eq!(sentinel.id, SENTINEL_CHAIN_ID);
}

#[tokio::test]
async fn test_auto_ids_never_collide_with_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChainRegistry::new(test_pool(&dir).await);

    registry.ensure_sentinel().await.unwrap();
    registry.ensure_registered(&["Chipotle"]).await.unwrap();

    let late = registry.lookup("Chipotle").await.unwrap().unwrap();
    assert_ne!(late.id, SENTINEL_CHAIN_ID);

    let sentinel = registry.lookup(SENTINEL_CHAIN_NAME).await.unwrap().unwrap();
    assert_eq!(sentinel.id, SENTINEL_CHAIN_ID);
}

#[tokio::test]
async fn test_resolve_or_sentinel_matches_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChainRegistry::new(test_pool(&dir).await);

    registry.ensure_registered(&TRACKED_CHAINS).await.unwrap();
    registry.ensure_sentinel().await.unwrap();

    // Registered name: identical to lookup
    let looked_up = registry.lookup("KFC").await.unwrap().unwrap();
    let resolved = registry.resolve_or_sentinel("KFC").await.unwrap();
    assert_eq!(looked_up, resolved);

    // Unregistered name: sentinel iff lookup is absent
    assert!(registry.lookup("Five Guys").await.unwrap().is_none());
    let fallback = registry.resolve_or_sentinel("Five Guys").await.unwrap();
    assert_eq!(fallback.id, SENTINEL_CHAIN_ID);
    assert_eq!(fallback.name, SENTINEL_CHAIN_NAME);
}

#[tokio::test]
async fn test_known_names_excludes_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ChainRegistry::new(test_pool(&dir).await);

    registry.ensure_registered(&TRACKED_CHAINS).await.unwrap();
    registry.ensure_sentinel().await.unwrap();

    let known = registry.known_names().await.unwrap();
    assert_eq!(known.len(), TRACKED_CHAINS.len());
    assert!(!known.contains(&SENTINEL_CHAIN_NAME.to_string()));
}

#[tokio::test]
async fn test_resolve_location_exact_key() {
    let dir = tempfile::tempdir().unwrap();
    let pool = test_pool(&dir).await;

    sqlx::query("INSERT INTO locations (city, state) VALUES ('Columbus', 'OH')")
        .execute(&pool)
        .await
        .unwrap();

    let location = resolve_location(&pool, "Columbus, OH").await.unwrap();
    assert_eq!(location.city, "Columbus");
    assert_eq!(location.state, "OH");
    assert_eq!(location.key(), "Columbus, OH");

    // Case-sensitive exact match only
    let miss = resolve_location(&pool, "columbus, oh").await;
    assert!(matches!(miss, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_all_location_keys() {
    let dir = tempfile::tempdir().unwrap();
    let pool = test_pool(&dir).await;

    for (city, state) in [("Columbus", "OH"), ("Austin", "TX")] {
        sqlx::query("INSERT INTO locations (city, state) VALUES (?, ?)")
            .bind(city)
            .bind(state)
            .execute(&pool)
            .await
            .unwrap();
    }

    let keys = all_location_keys(&pool).await.unwrap();
    assert_eq!(keys, vec!["Columbus, OH".to_string(), "Austin, TX".to_string()]);
}
