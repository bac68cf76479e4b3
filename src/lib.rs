// src/lib.rs

//! Larder - recipe management core
//!
//! The domain logic of a recipe manager: recipe storage and search,
//! ingredient quantity scaling for serving adjustments, and shopping
//! list generation by aggregating ingredient lines across recipes.
//!
//! # Architecture
//!
//! - Database-first: all state in SQLite, passed as an explicit
//!   connection rather than hidden module-level storage
//! - Models own their CRUD: [`db::models::Recipe`] and
//!   [`db::models::ShoppingList`] carry insert/find/update/delete
//! - Pure scaling: [`scale_ingredient`] transforms display text only
//!   and never touches stored recipes
//! - Aggregation: [`shopping::generate_from_recipes`] merges
//!   same-named ingredient lines into one entry per normalized name

pub mod db;
mod error;
pub mod scale;
pub mod shopping;

pub use db::models::{AggregatedIngredient, Recipe, ShoppingList};
pub use error::{Error, Result};
pub use scale::scale_ingredient;
pub use shopping::{IngredientUpdate, generate_from_recipes, update_ingredient};
