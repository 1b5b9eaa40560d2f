//! Topping registry service.
//!
//! # Responsibility
//! - Create, rename and delete toppings through a `ToppingRepository`.
//! - Keep a cached projection of the `toppings` table for duplicate checks.
//!
//! # Invariants
//! - Topping names are lowercased before comparison and persistence.
//! - Names are unique case-insensitively; the store's primary key backs up
//!   the cache check.
//! - `remove` and `rename` succeed whether or not the name exists.
//! - A committed write is never reported as failed; when the re-fetch after
//!   it fails, the payload is applied to the cache instead.

use super::log_key;
use crate::model::topping::{normalize_topping_name, Topping, ToppingValidationError};
use crate::repo::error::RepoError;
use crate::repo::topping_repo::ToppingRepository;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from topping registry operations.
#[derive(Debug)]
pub enum ToppingError {
    Validation(ToppingValidationError),
    /// A topping with this normalized name already exists.
    Duplicate(String),
    /// Record store failure.
    Store(RepoError),
}

impl Display for ToppingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Duplicate(_) => write!(f, "Topping already exists."),
            Self::Store(err) => write!(f, "record store request failed: {err}"),
        }
    }
}

impl Error for ToppingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ToppingValidationError> for ToppingError {
    fn from(value: ToppingValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ToppingError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Rejects `name` when the snapshot already holds it, ignoring case.
///
/// Pure check over a cached snapshot; never touches the store.
pub fn check_new_topping(snapshot: &[Topping], name: &str) -> Result<(), ToppingError> {
    let candidate = normalize_topping_name(name);
    if snapshot
        .iter()
        .any(|existing| normalize_topping_name(&existing.name) == candidate)
    {
        return Err(ToppingError::Duplicate(candidate));
    }
    Ok(())
}

/// Topping registry over a record store with a cached projection.
pub struct ToppingRegistry<R: ToppingRepository> {
    repo: R,
    cache: Vec<Topping>,
}

impl<R: ToppingRepository> ToppingRegistry<R> {
    /// Creates a registry and performs the initial fetch.
    pub fn load(repo: R) -> Result<Self, ToppingError> {
        let mut registry = Self {
            repo,
            cache: Vec::new(),
        };
        registry.refresh()?;
        Ok(registry)
    }

    /// Returns the cached toppings in store order.
    pub fn list(&self) -> &[Topping] {
        &self.cache
    }

    /// Replaces the cache with the store's current rows.
    ///
    /// On failure the previous cache is kept.
    pub fn refresh(&mut self) -> Result<&[Topping], ToppingError> {
        match self.repo.select_all() {
            Ok(rows) => {
                self.cache = rows;
                Ok(&self.cache)
            }
            Err(err) => {
                error!("event=topping_fetch module=registry status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Adds a topping under its lowercase name.
    pub fn add(&mut self, name: &str) -> Result<(), ToppingError> {
        let topping = Topping::new(name).inspect_err(|_| {
            info!("event=topping_add module=registry status=rejected reason=empty_name");
        })?;
        check_new_topping(&self.cache, &topping.name).inspect_err(|_| {
            info!(
                "event=topping_add module=registry status=rejected reason=duplicate name={}",
                log_key(&topping.name)
            );
        })?;

        self.repo
            .insert(&topping)
            .map_err(|err| store_failure("topping_add", &topping.name, err))?;
        info!(
            "event=topping_add module=registry status=ok name={}",
            log_key(&topping.name)
        );
        self.sync_after_write("topping_add", |cache| cache.push(topping));
        Ok(())
    }

    /// Renames `old_name` to the lowercase form of `new_name`.
    ///
    /// Renaming to a name already in the cache, including the current one,
    /// is rejected as a duplicate. A missing `old_name` changes nothing.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), ToppingError> {
        let topping = Topping::new(new_name).inspect_err(|_| {
            info!("event=topping_rename module=registry status=rejected reason=empty_name");
        })?;
        check_new_topping(&self.cache, &topping.name).inspect_err(|_| {
            info!(
                "event=topping_rename module=registry status=rejected reason=duplicate name={}",
                log_key(&topping.name)
            );
        })?;

        self.repo
            .update(old_name, &topping)
            .map_err(|err| store_failure("topping_rename", &topping.name, err))?;
        info!(
            "event=topping_rename module=registry status=ok from={} to={}",
            log_key(old_name),
            log_key(&topping.name)
        );
        self.sync_after_write("topping_rename", |cache| {
            for existing in cache.iter_mut().filter(|existing| existing.name == old_name) {
                *existing = topping.clone();
            }
        });
        Ok(())
    }

    /// Deletes the topping stored under exactly `name`.
    ///
    /// Pizzas that list the name keep it.
    pub fn remove(&mut self, name: &str) -> Result<(), ToppingError> {
        self.repo
            .delete(name)
            .map_err(|err| store_failure("topping_remove", name, err))?;
        info!(
            "event=topping_remove module=registry status=ok name={}",
            log_key(name)
        );
        self.sync_after_write("topping_remove", |cache| {
            cache.retain(|existing| existing.name != name);
        });
        Ok(())
    }

    /// Re-fetches after a committed write, falling back to `apply_payload`
    /// on the current cache when the store cannot be read.
    fn sync_after_write(&mut self, event: &str, apply_payload: impl FnOnce(&mut Vec<Topping>)) {
        match self.repo.select_all() {
            Ok(rows) => self.cache = rows,
            Err(err) => {
                warn!(
                    "event={event} module=registry status=stale reason=refetch_failed error={err}"
                );
                apply_payload(&mut self.cache);
            }
        }
    }
}

fn store_failure(event: &str, name: &str, err: RepoError) -> ToppingError {
    if let RepoError::UniqueViolation { .. } = err {
        info!(
            "event={event} module=registry status=rejected reason=store_duplicate name={}",
            log_key(name)
        );
        return ToppingError::Duplicate(name.to_string());
    }
    error!(
        "event={event} module=registry status=error name={} error={err}",
        log_key(name)
    );
    ToppingError::Store(err)
}
