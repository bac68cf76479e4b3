// src/db/models/mod.rs

//! Data models for larder database entities
//!
//! This module defines Rust structs that correspond to database tables
//! and provides methods for creating, reading, updating, and deleting records.

mod recipe;
mod shopping_list;

pub use recipe::Recipe;
pub use shopping_list::{AggregatedIngredient, ShoppingList};
