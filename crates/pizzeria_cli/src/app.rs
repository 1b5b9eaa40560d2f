//! Command-line arguments and configuration resolution.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "pizzeria.sqlite3";

/// Pizzeria: manage toppings and pizzas
#[derive(Debug, Parser)]
#[command(name = "pizzeria")]
#[command(version)]
#[command(about = "Manage pizza toppings and pizzas")]
pub struct Cli {
    /// SQLite database file (defaults to pizzeria.sqlite3 in the temp directory)
    #[arg(long, global = true, env = "PIZZERIA_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "PIZZERIA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "PIZZERIA_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Print listings as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage toppings
    #[command(subcommand)]
    Toppings(ToppingCommand),

    /// Manage pizzas
    #[command(subcommand)]
    Pizzas(PizzaCommand),
}

#[derive(Debug, Subcommand)]
pub enum ToppingCommand {
    /// List toppings
    List,
    /// Add a topping (stored lowercase)
    Add { name: String },
    /// Rename a topping
    Rename { old_name: String, new_name: String },
    /// Delete a topping by exact name
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
pub enum PizzaCommand {
    /// List pizzas
    List,
    /// Create a pizza
    Add {
        title: String,
        /// Topping name; repeat for each topping, in order (see `pizzeria toppings list`)
        #[arg(short, long = "topping")]
        toppings: Vec<String>,
    },
    /// Replace title and toppings of an existing pizza
    Update {
        id: i64,
        title: String,
        /// Topping name; repeat for each topping, in order (see `pizzeria toppings list`)
        #[arg(short, long = "topping")]
        toppings: Vec<String>,
    },
    /// Delete a pizza by id
    Remove { id: i64 },
}

impl Cli {
    /// Database path from `--db`/`PIZZERIA_DB_PATH`, else the temp directory.
    pub fn db_path(&self) -> PathBuf {
        self.db
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| pizzeria_core::default_log_level())
    }
}
