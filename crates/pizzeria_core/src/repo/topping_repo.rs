//! Topping record store contract and SQLite implementation.
//!
//! # Invariants
//! - `select_all` returns rows in insertion order; a rename keeps position.
//! - `name` is the primary key, so the store itself rejects duplicates.

use crate::model::topping::Topping;
use crate::repo::error::RepoResult;
use log::info;
use rusqlite::{params, Connection};

/// Record store operations for the `toppings` table.
pub trait ToppingRepository {
    fn select_all(&self) -> RepoResult<Vec<Topping>>;
    fn insert(&self, topping: &Topping) -> RepoResult<()>;
    /// Replaces the row keyed by `name`. A missing row is left alone.
    fn update(&self, name: &str, topping: &Topping) -> RepoResult<()>;
    fn delete(&self, name: &str) -> RepoResult<()>;
}

/// SQLite-backed topping store.
pub struct SqliteToppingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteToppingRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ToppingRepository for SqliteToppingRepository<'_> {
    fn select_all(&self) -> RepoResult<Vec<Topping>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM toppings ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut toppings = Vec::new();
        while let Some(row) = rows.next()? {
            toppings.push(Topping {
                name: row.get("name")?,
            });
        }
        Ok(toppings)
    }

    fn insert(&self, topping: &Topping) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO toppings (name) VALUES (?1);",
            params![topping.name.as_str()],
        )?;
        Ok(())
    }

    fn update(&self, name: &str, topping: &Topping) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE toppings SET name = ?1 WHERE name = ?2;",
            params![topping.name.as_str(), name],
        )?;
        if changed == 0 {
            info!("event=topping_update module=repo status=ok rows=0");
        }
        Ok(())
    }

    fn delete(&self, name: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM toppings WHERE name = ?1;", params![name])?;
        Ok(())
    }
}
