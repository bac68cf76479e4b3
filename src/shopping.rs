// src/shopping.rs

//! Shopping list generation and ingredient completion updates
//!
//! The aggregator flattens the ingredient lines of the requested
//! recipes into one stream and merges lines that normalize to the same
//! lowercase name into a single entry carrying every contributing
//! recipe id. Missing recipes are skipped, never fatal: a stale id in
//! the selection must not abort the whole batch.

use crate::db;
use crate::db::models::{AggregatedIngredient, Recipe, ShoppingList};
use crate::error::{Error, Result};
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Partial update for one aggregated ingredient entry.
///
/// Fields left as `None` keep their current value; an update that sets
/// nothing is an accepted no-op.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientUpdate {
    pub completed: Option<bool>,
    pub amount: Option<String>,
    pub display_name: Option<String>,
}

impl IngredientUpdate {
    /// Update that toggles only the completion flag.
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            ..Self::default()
        }
    }
}

/// Generate and persist a shopping list from the given recipe ids.
///
/// Ids are fetched in order; duplicates are permitted and contribute
/// again. Ids that do not resolve are logged and skipped, so the result
/// may cover fewer recipes than requested (and an all-missing selection
/// yields an empty list, not an error). The new list id, the header
/// insert, and the item inserts share one write transaction, which
/// keeps the max-existing+1 id assignment safe against overlapping
/// callers.
pub fn generate_from_recipes(
    conn: &mut Connection,
    recipe_ids: &[i64],
) -> Result<ShoppingList> {
    // Flatten to (line, source id) pairs: recipe order, then line order.
    let mut flattened: Vec<(String, i64)> = Vec::new();
    for &recipe_id in recipe_ids {
        match Recipe::find_by_id(conn, recipe_id)? {
            Some(recipe) => {
                for line in &recipe.ingredients {
                    flattened.push((line.clone(), recipe_id));
                }
            }
            None => {
                warn!("Recipe {} not found, skipping", recipe_id);
            }
        }
    }

    // Fold into first-seen-key order. The key is the trimmed lowercase
    // line; the first occurrence fixes display_name and amount.
    let mut ingredients: Vec<AggregatedIngredient> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (line, source_id) in flattened {
        let key = line.trim().to_lowercase();
        match seen.get(&key) {
            Some(&index) => ingredients[index].recipe_ids.push(source_id),
            None => {
                seen.insert(key.clone(), ingredients.len());
                ingredients.push(AggregatedIngredient {
                    name: key,
                    display_name: line,
                    // Placeholder: quantities are not summed across recipes.
                    amount: "1".to_string(),
                    recipe_ids: vec![source_id],
                    completed: false,
                });
            }
        }
    }
    debug!(
        "Aggregated {} recipes into {} shopping list entries",
        recipe_ids.len(),
        ingredients.len()
    );

    let list = db::transaction(conn, |tx| {
        let mut list = ShoppingList::new(recipe_ids.to_vec());
        list.ingredients = ingredients;
        let id = list.insert(tx)?;
        info!("Created shopping list {}", id);
        Ok(list)
    })?;

    Ok(list)
}

/// Merge `updates` into the ingredient at `index` of the given list and
/// return the refreshed list.
///
/// Fails with [`Error::NotFound`] when the list is absent or the index
/// is outside the list's current ingredient count. Addressing is
/// positional, so indices captured before any reorder or resize of the
/// ingredient sequence are stale.
pub fn update_ingredient(
    conn: &mut Connection,
    list_id: i64,
    index: usize,
    updates: &IngredientUpdate,
) -> Result<ShoppingList> {
    db::transaction(conn, |tx| {
        let list = ShoppingList::find_by_id(tx, list_id)?
            .ok_or_else(|| Error::not_found(format!("Shopping list {list_id}")))?;

        let Some(current) = list.ingredients.get(index) else {
            return Err(Error::not_found(format!(
                "Ingredient {index} in shopping list {list_id}"
            )));
        };

        let mut item = current.clone();
        if let Some(completed) = updates.completed {
            item.completed = completed;
        }
        if let Some(amount) = &updates.amount {
            item.amount = amount.clone();
        }
        if let Some(display_name) = &updates.display_name {
            item.display_name = display_name.clone();
        }

        ShoppingList::update_item(tx, list_id, index, &item)?;
        Ok(())
    })?;

    ShoppingList::find_by_id(conn, list_id)?
        .ok_or_else(|| Error::not_found(format!("Shopping list {list_id}")))
}
