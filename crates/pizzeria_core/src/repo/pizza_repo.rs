//! Pizza record store contract and SQLite implementation.
//!
//! # Invariants
//! - `toppings` is persisted as a JSON array, preserving caller order.
//! - `title_key` and `toppings_key` are derived from the draft on every
//!   write and carry unique indexes.
//! - Read paths reject rows whose topping column is not a JSON string array.

use crate::model::pizza::{Pizza, PizzaDraft, PizzaId};
use crate::repo::error::{RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection, Row};

/// Constraint name reported when two pizzas share a title key.
pub const TITLE_KEY_CONSTRAINT: &str = "pizzas.title_key";
/// Constraint name reported when two pizzas share a topping set.
pub const TOPPINGS_KEY_CONSTRAINT: &str = "pizzas.toppings_key";

/// Record store operations for the `pizzas` table.
pub trait PizzaRepository {
    fn select_all(&self) -> RepoResult<Vec<Pizza>>;
    /// Inserts a row and returns the store-assigned id.
    fn insert(&self, draft: &PizzaDraft) -> RepoResult<PizzaId>;
    /// Replaces the row with `id`. A missing row is left alone.
    fn update(&self, id: PizzaId, draft: &PizzaDraft) -> RepoResult<()>;
    fn delete(&self, id: PizzaId) -> RepoResult<()>;
}

/// SQLite-backed pizza store.
pub struct SqlitePizzaRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePizzaRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PizzaRepository for SqlitePizzaRepository<'_> {
    fn select_all(&self) -> RepoResult<Vec<Pizza>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, toppings FROM pizzas ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut pizzas = Vec::new();
        while let Some(row) = rows.next()? {
            pizzas.push(parse_pizza_row(row)?);
        }
        Ok(pizzas)
    }

    fn insert(&self, draft: &PizzaDraft) -> RepoResult<PizzaId> {
        self.conn.execute(
            "INSERT INTO pizzas (title, title_key, toppings, toppings_key)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.title(),
                draft.title_key(),
                encode_toppings(draft.toppings())?,
                draft.toppings_key(),
            ],
        )?;
        Ok(PizzaId(self.conn.last_insert_rowid()))
    }

    fn update(&self, id: PizzaId, draft: &PizzaDraft) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pizzas
             SET
                title = ?1,
                title_key = ?2,
                toppings = ?3,
                toppings_key = ?4
             WHERE id = ?5;",
            params![
                draft.title(),
                draft.title_key(),
                encode_toppings(draft.toppings())?,
                draft.toppings_key(),
                id.0,
            ],
        )?;
        if changed == 0 {
            info!("event=pizza_update module=repo status=ok rows=0 id={id}");
        }
        Ok(())
    }

    fn delete(&self, id: PizzaId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM pizzas WHERE id = ?1;", params![id.0])?;
        Ok(())
    }
}

fn parse_pizza_row(row: &Row<'_>) -> RepoResult<Pizza> {
    let id = PizzaId(row.get("id")?);
    let raw_toppings: String = row.get("toppings")?;
    let toppings = serde_json::from_str::<Vec<String>>(&raw_toppings).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid toppings value in pizzas.toppings for id {id}: {err}"
        ))
    })?;

    Ok(Pizza {
        id,
        title: row.get("title")?,
        toppings,
    })
}

fn encode_toppings(toppings: &[String]) -> RepoResult<String> {
    serde_json::to_string(toppings)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode toppings: {err}")))
}
