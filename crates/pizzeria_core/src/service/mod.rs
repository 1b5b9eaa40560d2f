//! Topping registry and pizza catalog services.
//!
//! # Responsibility
//! - Validate input against a cached snapshot before calling the store.
//! - Keep the cache in sync with the store after every mutation.
//!
//! # Invariants
//! - Validation failures never reach the store.
//! - A failed store call leaves the cache as it was.
//! - Every successful mutation is followed by a full re-fetch.

pub mod pizza_catalog;
pub mod topping_registry;

const MAX_LOGGED_KEY_CHARS: usize = 64;

/// Formats a record key for a single log line.
fn log_key(value: &str) -> String {
    crate::logging::sanitize_message(value, MAX_LOGGED_KEY_CHARS)
}
