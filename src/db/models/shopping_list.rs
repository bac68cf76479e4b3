// src/db/models/shopping_list.rs

//! ShoppingList and AggregatedIngredient models

use super::recipe::{from_json_column, to_json};
use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

/// One merged shopping-list entry.
///
/// `name` is the collapse key (trimmed, lowercased ingredient text);
/// two lines with the same key always merge into one entry regardless
/// of originating recipe. `completed` is the only field that changes
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedIngredient {
    pub name: String,
    pub display_name: String,
    pub amount: String,
    pub recipe_ids: Vec<i64>,
    pub completed: bool,
}

/// A generated shopping list.
///
/// `recipe_ids` records the ids the caller requested, in request
/// order; per-ingredient `recipe_ids` carry the attribution to the
/// recipes that were actually fetched. `ingredients` keeps stable
/// first-seen order, addressed positionally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: Option<i64>,
    pub recipe_ids: Vec<i64>,
    pub ingredients: Vec<AggregatedIngredient>,
    pub created_at: Option<String>,
}

impl ShoppingList {
    /// Create an unpersisted list for the given requested recipe ids.
    pub fn new(recipe_ids: Vec<i64>) -> Self {
        Self {
            id: None,
            recipe_ids,
            ingredients: Vec::new(),
            created_at: None,
        }
    }

    /// Next list id: one greater than the maximum existing id, or 1
    /// when no lists exist.
    ///
    /// Only safe inside the same write transaction as the insert that
    /// uses it; see [`crate::db::transaction`].
    pub fn next_id(conn: &Connection) -> Result<i64> {
        let next: i64 = conn.query_row(
            "SELECT COALESCE(MAX(id), 0) + 1 FROM shopping_lists",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Insert this list and its ingredient rows.
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        let id = Self::next_id(conn)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO shopping_lists (id, recipe_ids, created_at) VALUES (?1, ?2, ?3)",
            params![id, to_json(&self.recipe_ids)?, &created_at],
        )?;

        for (position, item) in self.ingredients.iter().enumerate() {
            conn.execute(
                "INSERT INTO shopping_list_items
                     (list_id, position, name, display_name, amount, recipe_ids, completed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id,
                    position as i64,
                    &item.name,
                    &item.display_name,
                    &item.amount,
                    to_json(&item.recipe_ids)?,
                    item.completed as i32,
                ],
            )?;
        }

        self.id = Some(id);
        self.created_at = Some(created_at);
        Ok(id)
    }

    /// Find a shopping list by ID, with its ingredients in position order
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, recipe_ids, created_at FROM shopping_lists WHERE id = ?1",
        )?;

        let header = stmt.query_row([id], Self::from_header_row).optional()?;
        let Some(mut list) = header else {
            return Ok(None);
        };

        list.ingredients = Self::load_items(conn, id)?;
        Ok(Some(list))
    }

    /// List all shopping lists, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, recipe_ids, created_at FROM shopping_lists
             ORDER BY created_at DESC, id DESC",
        )?;

        let mut lists = stmt
            .query_map([], Self::from_header_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for list in &mut lists {
            // id is always set on rows loaded from the database
            let id = list.id.unwrap_or_default();
            list.ingredients = Self::load_items(conn, id)?;
        }

        Ok(lists)
    }

    /// Delete a shopping list by ID, returning the deleted record
    pub fn delete(conn: &Connection, id: i64) -> Result<Self> {
        let list = Self::find_by_id(conn, id)?
            .ok_or_else(|| Error::not_found(format!("Shopping list {id}")))?;

        conn.execute("DELETE FROM shopping_lists WHERE id = ?1", [id])?;
        Ok(list)
    }

    /// Overwrite the ingredient row at `position` with `item`.
    pub fn update_item(
        conn: &Connection,
        list_id: i64,
        position: usize,
        item: &AggregatedIngredient,
    ) -> Result<()> {
        let changed = conn.execute(
            "UPDATE shopping_list_items
             SET name = ?1, display_name = ?2, amount = ?3, recipe_ids = ?4, completed = ?5
             WHERE list_id = ?6 AND position = ?7",
            params![
                &item.name,
                &item.display_name,
                &item.amount,
                to_json(&item.recipe_ids)?,
                item.completed as i32,
                list_id,
                position as i64,
            ],
        )?;

        if changed == 0 {
            return Err(Error::not_found(format!(
                "Ingredient {position} in shopping list {list_id}"
            )));
        }
        Ok(())
    }

    fn load_items(conn: &Connection, list_id: i64) -> Result<Vec<AggregatedIngredient>> {
        let mut stmt = conn.prepare(
            "SELECT name, display_name, amount, recipe_ids, completed
             FROM shopping_list_items WHERE list_id = ?1 ORDER BY position",
        )?;

        let items = stmt
            .query_map([list_id], AggregatedIngredient::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn from_header_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            recipe_ids: from_json_column(row, 1)?,
            ingredients: Vec::new(),
            created_at: row.get(2)?,
        })
    }
}

impl AggregatedIngredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            display_name: row.get(1)?,
            amount: row.get(2)?,
            recipe_ids: from_json_column(row, 3)?,
            completed: row.get::<_, i32>(4)? != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn sample_list() -> ShoppingList {
        let mut list = ShoppingList::new(vec![1, 2]);
        list.ingredients = vec![
            AggregatedIngredient {
                name: "2 cups flour".to_string(),
                display_name: "2 cups flour".to_string(),
                amount: "1".to_string(),
                recipe_ids: vec![1],
                completed: false,
            },
            AggregatedIngredient {
                name: "salt".to_string(),
                display_name: "Salt".to_string(),
                amount: "1".to_string(),
                recipe_ids: vec![1, 2],
                completed: false,
            },
        ];
        list
    }

    #[test]
    fn test_insert_assigns_id_one_when_empty() {
        let conn = db::open_in_memory().unwrap();
        let mut list = sample_list();
        assert_eq!(list.insert(&conn).unwrap(), 1);
        assert!(list.created_at.is_some());
    }

    #[test]
    fn test_roundtrip_preserves_item_order() {
        let conn = db::open_in_memory().unwrap();
        let mut list = sample_list();
        let id = list.insert(&conn).unwrap();

        let loaded = ShoppingList::find_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.recipe_ids, vec![1, 2]);
        assert_eq!(loaded.ingredients.len(), 2);
        assert_eq!(loaded.ingredients[0].display_name, "2 cups flour");
        assert_eq!(loaded.ingredients[1].display_name, "Salt");
        assert_eq!(loaded.ingredients[1].recipe_ids, vec![1, 2]);
    }

    #[test]
    fn test_next_id_skips_over_max() {
        let conn = db::open_in_memory().unwrap();
        sample_list().insert(&conn).unwrap();
        sample_list().insert(&conn).unwrap();
        assert_eq!(ShoppingList::next_id(&conn).unwrap(), 3);
    }

    #[test]
    fn test_delete_returns_record_and_removes_items() {
        let conn = db::open_in_memory().unwrap();
        let mut list = sample_list();
        let id = list.insert(&conn).unwrap();

        let deleted = ShoppingList::delete(&conn, id).unwrap();
        assert_eq!(deleted.ingredients.len(), 2);
        assert!(ShoppingList::find_by_id(&conn, id).unwrap().is_none());

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM shopping_list_items", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(orphans, 0);

        assert!(matches!(
            ShoppingList::delete(&conn, id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_update_item_persists() {
        let conn = db::open_in_memory().unwrap();
        let mut list = sample_list();
        let id = list.insert(&conn).unwrap();

        let mut item = list.ingredients[1].clone();
        item.completed = true;
        ShoppingList::update_item(&conn, id, 1, &item).unwrap();

        let loaded = ShoppingList::find_by_id(&conn, id).unwrap().unwrap();
        assert!(loaded.ingredients[1].completed);
        assert!(!loaded.ingredients[0].completed);
    }
}
