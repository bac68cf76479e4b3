// src/db/models/recipe.rs

//! Recipe model - stored recipes with free-text ingredient lines

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored recipe.
///
/// `ingredients` is an ordered sequence of free-text lines such as
/// "2 cups flour"; quantity and unit stay embedded in the text and are
/// only interpreted at display time by [`crate::scale::scale_ingredient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    pub servings: Option<i64>,
    pub categories: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: Option<String>,
}

const RECIPE_COLUMNS: &str = "id, title, description, prep_time, cook_time, servings, \
                              categories, ingredients, instructions, image_url, created_at";

impl Recipe {
    /// Create a new recipe with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            prep_time: None,
            cook_time: None,
            servings: None,
            categories: Vec::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            image_url: None,
            created_at: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("recipe title is empty".to_string()));
        }
        Ok(())
    }

    /// Insert this recipe into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        self.validate()?;

        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO recipes (title, description, prep_time, cook_time, servings,
                                  categories, ingredients, instructions, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &self.title,
                &self.description,
                &self.prep_time,
                &self.cook_time,
                &self.servings,
                to_json(&self.categories)?,
                to_json(&self.ingredients)?,
                to_json(&self.instructions)?,
                &self.image_url,
                &created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        self.created_at = Some(created_at);
        Ok(id)
    }

    /// Find a recipe by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"
        ))?;

        let recipe = stmt.query_row([id], Self::from_row).optional()?;

        Ok(recipe)
    }

    /// List all recipes, newest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC, id DESC"
        ))?;

        let recipes = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(recipes)
    }

    /// Update this recipe in place
    pub fn update(&self, conn: &Connection) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::InvalidInput("cannot update recipe without ID".to_string()))?;
        self.validate()?;

        let changed = conn.execute(
            "UPDATE recipes SET title = ?1, description = ?2, prep_time = ?3, cook_time = ?4,
                                servings = ?5, categories = ?6, ingredients = ?7,
                                instructions = ?8, image_url = ?9
             WHERE id = ?10",
            params![
                &self.title,
                &self.description,
                &self.prep_time,
                &self.cook_time,
                &self.servings,
                to_json(&self.categories)?,
                to_json(&self.ingredients)?,
                to_json(&self.instructions)?,
                &self.image_url,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(Error::not_found(format!("Recipe {id}")));
        }
        Ok(())
    }

    /// Delete a recipe by ID, returning the deleted record
    pub fn delete(conn: &Connection, id: i64) -> Result<Self> {
        let recipe = Self::find_by_id(conn, id)?
            .ok_or_else(|| Error::not_found(format!("Recipe {id}")))?;

        conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(recipe)
    }

    /// Search recipes by a case-insensitive substring of the title,
    /// description, any category, or any ingredient line.
    ///
    /// A blank query returns all recipes.
    pub fn search(conn: &Connection, query: &str) -> Result<Vec<Self>> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Self::list_all(conn);
        }

        let matches = |recipe: &Recipe| {
            recipe.title.to_lowercase().contains(&term)
                || recipe.description.to_lowercase().contains(&term)
                || recipe.categories.iter().any(|c| c.to_lowercase().contains(&term))
                || recipe.ingredients.iter().any(|i| i.to_lowercase().contains(&term))
        };

        Ok(Self::list_all(conn)?.into_iter().filter(matches).collect())
    }

    /// List recipes carrying the given category (exact match against the
    /// lowercased probe). An empty category returns all recipes.
    pub fn find_by_category(conn: &Connection, category: &str) -> Result<Vec<Self>> {
        if category.trim().is_empty() {
            return Self::list_all(conn);
        }

        let probe = category.to_lowercase();
        Ok(Self::list_all(conn)?
            .into_iter()
            .filter(|r| r.categories.iter().any(|c| c == &probe))
            .collect())
    }

    /// Distinct lowercase categories with recipe counts, alphabetical.
    pub fn all_categories(conn: &Connection) -> Result<Vec<(String, usize)>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for recipe in Self::list_all(conn)? {
            for category in &recipe.categories {
                *counts.entry(category.to_lowercase()).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    /// Convert a database row to a Recipe
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            prep_time: row.get(3)?,
            cook_time: row.get(4)?,
            servings: row.get(5)?,
            categories: from_json_column(row, 6)?,
            ingredients: from_json_column(row, 7)?,
            instructions: from_json_column(row, 8)?,
            image_url: row.get(9)?,
            created_at: row.get(10)?,
        })
    }
}

/// Encode a value for storage in a JSON text column.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Parse(format!("failed to serialize column value: {e}")))
}

/// Decode a JSON text column.
pub(crate) fn from_json_column<T: serde::de::DeserializeOwned>(
    row: &Row,
    index: usize,
) -> rusqlite::Result<T> {
    let json: String = row.get(index)?;
    serde_json::from_str(&json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}
