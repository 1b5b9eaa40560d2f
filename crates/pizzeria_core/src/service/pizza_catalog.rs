//! Pizza catalog service.
//!
//! # Responsibility
//! - Create, update and delete pizzas through a `PizzaRepository`.
//! - Reject blank titles, duplicate titles and duplicate topping sets
//!   before any store call.
//!
//! # Invariants
//! - Title uniqueness compares trimmed, lowercased titles.
//! - Topping-set uniqueness ignores order but not repeated names.
//! - Title collisions are reported ahead of topping-set collisions.
//! - Updates never collide with the pizza being edited.
//! - A committed write is never reported as failed; when the re-fetch after
//!   it fails, the payload is applied to the cache instead.

use super::log_key;
use crate::model::pizza::{
    same_topping_set, title_key, Pizza, PizzaDraft, PizzaId, PizzaValidationError,
};
use crate::repo::error::RepoError;
use crate::repo::pizza_repo::{PizzaRepository, TITLE_KEY_CONSTRAINT, TOPPINGS_KEY_CONSTRAINT};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from pizza catalog operations.
#[derive(Debug)]
pub enum PizzaError {
    Validation(PizzaValidationError),
    DuplicateTitle,
    DuplicateToppingSet,
    /// Record store failure.
    Store(RepoError),
}

impl Display for PizzaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateTitle => write!(f, "A pizza with this title already exists."),
            Self::DuplicateToppingSet => {
                write!(f, "A pizza with these exact toppings already exists.")
            }
            Self::Store(err) => write!(f, "record store request failed: {err}"),
        }
    }
}

impl Error for PizzaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PizzaValidationError> for PizzaError {
    fn from(value: PizzaValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PizzaError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UniqueViolation { ref constraint } if constraint == TITLE_KEY_CONSTRAINT => {
                Self::DuplicateTitle
            }
            RepoError::UniqueViolation { ref constraint }
                if constraint == TOPPINGS_KEY_CONSTRAINT =>
            {
                Self::DuplicateToppingSet
            }
            other => Self::Store(other),
        }
    }
}

/// Checks `draft` against every pizza in `snapshot` except `editing`.
///
/// The whole snapshot is scanned for a title collision before any topping
/// set is compared. Pure check; never touches the store.
pub fn check_pizza_conflicts(
    snapshot: &[Pizza],
    draft: &PizzaDraft,
    editing: Option<PizzaId>,
) -> Result<(), PizzaError> {
    let wanted_title = draft.title_key();
    if others(snapshot, editing).any(|pizza| title_key(&pizza.title) == wanted_title) {
        return Err(PizzaError::DuplicateTitle);
    }
    if others(snapshot, editing)
        .any(|pizza| same_topping_set(&pizza.toppings, draft.toppings()))
    {
        return Err(PizzaError::DuplicateToppingSet);
    }
    Ok(())
}

fn others(snapshot: &[Pizza], editing: Option<PizzaId>) -> impl Iterator<Item = &Pizza> {
    snapshot
        .iter()
        .filter(move |pizza| Some(pizza.id) != editing)
}

/// Pizza catalog over a record store with a cached projection.
pub struct PizzaCatalog<R: PizzaRepository> {
    repo: R,
    cache: Vec<Pizza>,
}

impl<R: PizzaRepository> PizzaCatalog<R> {
    /// Creates a catalog and performs the initial fetch.
    pub fn load(repo: R) -> Result<Self, PizzaError> {
        let mut catalog = Self {
            repo,
            cache: Vec::new(),
        };
        catalog.refresh()?;
        Ok(catalog)
    }

    /// Returns the cached pizzas ordered by id.
    pub fn list(&self) -> &[Pizza] {
        &self.cache
    }

    /// Returns the cached pizza with `id`.
    pub fn get(&self, id: PizzaId) -> Option<&Pizza> {
        self.cache.iter().find(|pizza| pizza.id == id)
    }

    /// Replaces the cache with the store's current rows.
    ///
    /// On failure the previous cache is kept.
    pub fn refresh(&mut self) -> Result<&[Pizza], PizzaError> {
        match self.repo.select_all() {
            Ok(rows) => {
                self.cache = rows;
                Ok(&self.cache)
            }
            Err(err) => {
                error!("event=pizza_fetch module=catalog status=error error={err}");
                Err(PizzaError::Store(err))
            }
        }
    }

    /// Adds a pizza and returns its store-assigned id.
    pub fn add(&mut self, title: &str, toppings: Vec<String>) -> Result<PizzaId, PizzaError> {
        let draft = self.validate("pizza_add", title, toppings, None)?;
        let id = self
            .repo
            .insert(&draft)
            .map_err(|err| store_failure("pizza_add", err))?;
        info!(
            "event=pizza_add module=catalog status=ok id={id} title={} toppings={}",
            log_key(draft.title()),
            draft.toppings().len()
        );
        self.sync_after_write("pizza_add", |cache| cache.push(draft.into_pizza(id)));
        Ok(id)
    }

    /// Replaces title and toppings of pizza `id`. A missing id changes nothing.
    pub fn update(
        &mut self,
        id: PizzaId,
        title: &str,
        toppings: Vec<String>,
    ) -> Result<(), PizzaError> {
        let draft = self.validate("pizza_update", title, toppings, Some(id))?;
        self.repo
            .update(id, &draft)
            .map_err(|err| store_failure("pizza_update", err))?;
        info!(
            "event=pizza_update module=catalog status=ok id={id} title={} toppings={}",
            log_key(draft.title()),
            draft.toppings().len()
        );
        self.sync_after_write("pizza_update", |cache| {
            if let Some(existing) = cache.iter_mut().find(|pizza| pizza.id == id) {
                *existing = draft.into_pizza(id);
            }
        });
        Ok(())
    }

    /// Deletes pizza `id`. Missing ids are not an error.
    pub fn remove(&mut self, id: PizzaId) -> Result<(), PizzaError> {
        self.repo
            .delete(id)
            .map_err(|err| store_failure("pizza_remove", err))?;
        info!("event=pizza_remove module=catalog status=ok id={id}");
        self.sync_after_write("pizza_remove", |cache| {
            cache.retain(|pizza| pizza.id != id);
        });
        Ok(())
    }

    /// Re-fetches after a committed write, falling back to `apply_payload`
    /// on the current cache when the store cannot be read.
    fn sync_after_write(&mut self, event: &str, apply_payload: impl FnOnce(&mut Vec<Pizza>)) {
        match self.repo.select_all() {
            Ok(rows) => self.cache = rows,
            Err(err) => {
                warn!(
                    "event={event} module=catalog status=stale reason=refetch_failed error={err}"
                );
                apply_payload(&mut self.cache);
            }
        }
    }

    fn validate(
        &self,
        event: &str,
        title: &str,
        toppings: Vec<String>,
        editing: Option<PizzaId>,
    ) -> Result<PizzaDraft, PizzaError> {
        let checked = PizzaDraft::new(title, toppings)
            .map_err(PizzaError::from)
            .and_then(|draft| {
                check_pizza_conflicts(&self.cache, &draft, editing)?;
                Ok(draft)
            });
        if let Err(err) = &checked {
            info!(
                "event={event} module=catalog status=rejected reason={}",
                rejection_reason(err)
            );
        }
        checked
    }
}

fn store_failure(event: &str, err: RepoError) -> PizzaError {
    let mapped = PizzaError::from(err);
    match &mapped {
        PizzaError::Store(inner) => {
            error!("event={event} module=catalog status=error error={inner}");
        }
        other => {
            info!(
                "event={event} module=catalog status=rejected reason=store_{}",
                rejection_reason(other)
            );
        }
    }
    mapped
}

fn rejection_reason(err: &PizzaError) -> &'static str {
    match err {
        PizzaError::Validation(PizzaValidationError::EmptyTitle) => "empty_title",
        PizzaError::DuplicateTitle => "duplicate_title",
        PizzaError::DuplicateToppingSet => "duplicate_toppings",
        PizzaError::Store(_) => "store_error",
    }
}
