// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use larder::Recipe;
use larder::db;
use std::sync::Once;
use tempfile::TempDir;

static TRACING: Once = Once::new();

/// Initialize tracing once per test binary; RUST_LOG overrides the default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a test database seeded with two recipes.
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
/// The seeded recipes have ids 1 (Pancakes) and 2 (Scrambled Eggs); both
/// contain a salt line differing only in case, so aggregating the pair
/// exercises case-insensitive merging.
pub fn setup_test_db() -> (TempDir, String) {
    init_tracing();

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let conn = db::open(&db_path).unwrap();

    let mut pancakes = Recipe::new("Pancakes");
    pancakes.description = "Fluffy breakfast pancakes".to_string();
    pancakes.servings = Some(4);
    pancakes.categories = vec!["breakfast".to_string()];
    pancakes.ingredients = vec![
        "2 cups flour".to_string(),
        "Salt".to_string(),
        "1 cup milk".to_string(),
    ];
    pancakes.instructions = vec![
        "Whisk dry ingredients".to_string(),
        "Fold in milk".to_string(),
    ];
    pancakes.insert(&conn).unwrap();

    let mut eggs = Recipe::new("Scrambled Eggs");
    eggs.description = "Soft scrambled eggs".to_string();
    eggs.servings = Some(2);
    eggs.categories = vec!["breakfast".to_string(), "quick".to_string()];
    eggs.ingredients = vec![
        "4 eggs".to_string(),
        "salt".to_string(),
        "1 tbsp butter".to_string(),
    ];
    eggs.insert(&conn).unwrap();

    (temp_dir, db_path)
}
