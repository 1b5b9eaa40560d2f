//! Domain model for toppings and pizzas.
//!
//! # Responsibility
//! - Define the records owned by the record store.
//! - Provide the pure normalization and key helpers used for uniqueness.
//!
//! # Invariants
//! - Topping names are lowercase.
//! - Pizza titles are trimmed and never blank.

pub mod pizza;
pub mod topping;
