//! Pizza record, write payload and uniqueness keys.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - Two pizzas collide on title when `title_key` matches.
//! - Two pizzas collide on toppings when `same_topping_set` holds, which is
//!   exactly when `toppings_key` matches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Local input errors detected before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PizzaValidationError {
    /// Title is blank after trim.
    EmptyTitle,
}

impl Display for PizzaValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please enter a pizza title."),
        }
    }
}

impl Error for PizzaValidationError {}

/// Store-assigned pizza identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PizzaId(pub i64);

impl Display for PizzaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named combination of toppings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pizza {
    pub id: PizzaId,
    pub title: String,
    /// Topping names in caller order. Names are not checked against the
    /// topping registry.
    pub toppings: Vec<String>,
}

/// Insert/update payload for a pizza row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PizzaDraft {
    title: String,
    toppings: Vec<String>,
}

impl PizzaDraft {
    /// Builds a draft with a trimmed title.
    ///
    /// # Errors
    /// - `PizzaValidationError::EmptyTitle` when the title is blank.
    pub fn new(title: &str, toppings: Vec<String>) -> Result<Self, PizzaValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PizzaValidationError::EmptyTitle);
        }
        Ok(Self {
            title: title.to_string(),
            toppings,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }

    pub fn toppings_key(&self) -> String {
        toppings_key(&self.toppings)
    }

    /// Pairs the draft with the id the store assigned to it.
    pub fn into_pizza(self, id: PizzaId) -> Pizza {
        Pizza {
            id,
            title: self.title,
            toppings: self.toppings,
        }
    }
}

/// Canonical title form used for duplicate detection.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Returns whether two topping lists describe the same pizza.
///
/// Lists match when their raw lengths are equal and every name of each list
/// appears in the other. Order is ignored, repeated names are not collapsed
/// before the length check: `[a, a]` and `[a]` differ.
pub fn same_topping_set(left: &[String], right: &[String]) -> bool {
    left.len() == right.len()
        && left.iter().all(|name| right.contains(name))
        && right.iter().all(|name| left.contains(name))
}

/// Canonical topping-list form: raw length plus the sorted distinct names.
///
/// `toppings_key(a) == toppings_key(b)` iff `same_topping_set(a, b)`.
pub fn toppings_key(toppings: &[String]) -> String {
    let distinct = toppings
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>();
    let names = serde_json::to_string(&distinct).unwrap_or_default();
    format!("{}:{}", toppings.len(), names)
}
