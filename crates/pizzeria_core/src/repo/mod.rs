//! Record store contracts and SQLite implementations.
//!
//! # Responsibility
//! - Expose the four record-store operations per table: select all,
//!   insert, update by key, delete by key.
//! - Keep SQL details behind the repository boundary.
//!
//! # Invariants
//! - `update` and `delete` succeed for keys that do not exist.
//! - Unique-key violations surface as `RepoError::UniqueViolation`.

pub mod error;
pub mod pizza_repo;
pub mod topping_repo;
