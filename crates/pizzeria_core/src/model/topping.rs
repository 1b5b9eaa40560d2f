//! Topping record.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Local input errors detected before any store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToppingValidationError {
    /// Name is blank after trim.
    EmptyName,
}

impl Display for ToppingValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Please enter a topping name."),
        }
    }
}

impl Error for ToppingValidationError {}

/// A named ingredient, keyed by its lowercase name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topping {
    pub name: String,
}

impl Topping {
    /// Builds a topping from raw input, lowercasing the name.
    ///
    /// Only case is normalized; surrounding whitespace is kept as typed.
    ///
    /// # Errors
    /// - `ToppingValidationError::EmptyName` when the name is blank.
    pub fn new(raw_name: &str) -> Result<Self, ToppingValidationError> {
        if raw_name.trim().is_empty() {
            return Err(ToppingValidationError::EmptyName);
        }
        Ok(Self {
            name: normalize_topping_name(raw_name),
        })
    }
}

/// Lowercases a raw topping name.
pub fn normalize_topping_name(raw_name: &str) -> String {
    raw_name.to_lowercase()
}
