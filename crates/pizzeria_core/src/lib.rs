//! Core domain logic for the pizzeria inventory.
//! This crate is the single source of truth for topping and pizza invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pizza::{same_topping_set, title_key, toppings_key, Pizza, PizzaDraft, PizzaId};
pub use model::topping::Topping;
pub use repo::error::{RepoError, RepoResult};
pub use repo::pizza_repo::{PizzaRepository, SqlitePizzaRepository};
pub use repo::topping_repo::{SqliteToppingRepository, ToppingRepository};
pub use service::pizza_catalog::{check_pizza_conflicts, PizzaCatalog, PizzaError};
pub use service::topping_registry::{check_new_topping, ToppingError, ToppingRegistry};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
