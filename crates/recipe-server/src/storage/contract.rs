//! Behaviour every `RecipeStore` backend must share.
//!
//! Each check expects an empty store and leaves it empty again.

use recipe_core::{Ingredient, Instruction, Recipe, RecipeStore, StoreError};
use std::sync::Arc;
use std::time::Duration;

pub fn sample_recipe(id: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: "Test Recipe".to_string(),
        description: "A test recipe".to_string(),
        prep_time: Duration::from_secs(15 * 60),
        cook_time: Duration::from_secs(30 * 60),
        servings: 4,
        ingredients: vec![
            Ingredient {
                id: "ing-0".to_string(),
                name: "Chickpeas".to_string(),
                amount: 2.0,
                unit: "cups".to_string(),
                position: 0,
            },
            Ingredient {
                id: "ing-1".to_string(),
                name: "Cumin".to_string(),
                amount: 1.5,
                unit: "tsp".to_string(),
                position: 1,
            },
        ],
        instructions: vec![Instruction {
            id: "step-0".to_string(),
            step: "Soak overnight".to_string(),
            position: 0,
        }],
    }
}

pub async fn run_all(store: &dyn RecipeStore) {
    list_empty(store).await;
    create_then_get(store).await;
    duplicate_create(store).await;
    get_missing(store).await;
    update_missing(store).await;
    update_replaces(store).await;
    delete_then_get(store).await;
    delete_missing(store).await;
    list_after_creates(store).await;
    falafel_scenario(store).await;
    unencodable_record_rejected(store).await;
}

async fn list_empty(store: &dyn RecipeStore) {
    assert!(store.list().await.unwrap().is_empty());
}

async fn create_then_get(store: &dyn RecipeStore) {
    let recipe = sample_recipe("test-recipe-1");
    store.create(&recipe).await.unwrap();
    assert_eq!(store.get(&recipe.id).await.unwrap(), recipe);
    store.delete(&recipe.id).await.unwrap();
}

async fn duplicate_create(store: &dyn RecipeStore) {
    let original = sample_recipe("dup");
    store.create(&original).await.unwrap();

    let mut second = original.clone();
    second.title = "Second".to_string();
    let err = store.create(&second).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(ref id) if id == "dup"));

    assert_eq!(store.get("dup").await.unwrap(), original);
    store.delete("dup").await.unwrap();
}

async fn get_missing(store: &dyn RecipeStore) {
    let err = store.get("non-existent").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref id) if id == "non-existent"));
}

async fn update_missing(store: &dyn RecipeStore) {
    let err = store.update(&sample_recipe("non-existent")).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(store.get("non-existent").await.unwrap_err().is_not_found());
    assert!(store.list().await.unwrap().is_empty());
}

async fn update_replaces(store: &dyn RecipeStore) {
    let original = sample_recipe("replace");
    store.create(&original).await.unwrap();

    let mut replacement = Recipe::new("replace", "Updated Test Recipe");
    replacement.servings = 2;
    store.update(&replacement).await.unwrap();

    let stored = store.get("replace").await.unwrap();
    assert_eq!(stored, replacement);
    assert!(stored.ingredients.is_empty());
    assert!(stored.description.is_empty());
    store.delete("replace").await.unwrap();
}

async fn delete_then_get(store: &dyn RecipeStore) {
    store.create(&sample_recipe("gone")).await.unwrap();
    store.delete("gone").await.unwrap();
    assert!(store.get("gone").await.unwrap_err().is_not_found());
}

async fn delete_missing(store: &dyn RecipeStore) {
    assert!(store.delete("non-existent").await.unwrap_err().is_not_found());
}

async fn list_after_creates(store: &dyn RecipeStore) {
    let mut created: Vec<Recipe> = (0..5)
        .map(|i| {
            let mut r = sample_recipe(&format!("list-{}", i));
            r.servings = i;
            r
        })
        .collect();
    for recipe in created.iter().rev() {
        store.create(recipe).await.unwrap();
    }

    let mut listed = store.list().await.unwrap();
    listed.sort_by(|a, b| a.id.cmp(&b.id));
    created.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(listed, created);

    for recipe in &created {
        store.delete(&recipe.id).await.unwrap();
    }
}

async fn falafel_scenario(store: &dyn RecipeStore) {
    let mut recipe = Recipe::new("1", "Falafel");
    recipe.servings = 4;
    store.create(&recipe).await.unwrap();
    assert_eq!(store.get("1").await.unwrap(), recipe);

    let mut v2 = Recipe::new("1", "Falafel v2");
    v2.servings = 6;
    store.update(&v2).await.unwrap();
    let stored = store.get("1").await.unwrap();
    assert_eq!(stored.servings, 6);
    assert_eq!(stored.title, "Falafel v2");

    store.delete("1").await.unwrap();
    assert!(store.get("1").await.unwrap_err().is_not_found());
    assert!(store.list().await.unwrap().is_empty());
}

pub async fn concurrent_distinct_creates(store: Arc<dyn RecipeStore>) {
    let handles: Vec<_> = (0..32)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.create(&sample_recipe(&format!("r-{:02}", i))).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 32);
    for i in 0..32 {
        let id = format!("r-{:02}", i);
        assert!(listed.iter().any(|r| r.id == id), "missing {}", id);
    }
}

pub async fn concurrent_same_id_creates(store: Arc<dyn RecipeStore>) {
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut recipe = sample_recipe("contested");
                recipe.servings = i;
                store.create(&recipe).await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(err) => assert!(err.is_already_exists(), "unexpected error: {}", err),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(store.list().await.unwrap().len(), 1);
}

async fn unencodable_record_rejected(store: &dyn RecipeStore) {
    let mut recipe = sample_recipe("too-long");
    recipe.cook_time = recipe_core::MAX_DURATION + Duration::from_secs(1);

    let err = store.create(&recipe).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)), "{:?}", err);

    store.create(&sample_recipe("too-long")).await.unwrap();
    let err = store.update(&recipe).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)), "{:?}", err);
    assert_eq!(store.get("too-long").await.unwrap(), sample_recipe("too-long"));

    store.delete("too-long").await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}
