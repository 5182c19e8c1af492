//! Ship query and mutation service.

use crate::domain::{PageRequest, Ship, ShipDraft};
use crate::error::{CosmoportError, Result};
use crate::filter::ShipFilter;
use crate::store::ShipStore;
use crate::validate;

/// Parse a ship id from path text. Non-numeric or non-positive ids are
/// invalid input.
pub fn parse_id(raw: &str) -> Result<i64> {
    let id = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| CosmoportError::InvalidInput)?;
    ensure_positive(id)
}

fn ensure_positive(id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(CosmoportError::InvalidInput);
    }
    Ok(id)
}

/// Orchestrates filtering, validation, and rating over a [`ShipStore`].
#[derive(Debug, Clone)]
pub struct ShipService<S> {
    store: S,
}

impl<S: ShipStore> ShipService<S> {
    /// Wrap a record store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// One page of ships matching `filter`.
    pub fn list(&self, filter: &ShipFilter, page: &PageRequest) -> Result<Vec<Ship>> {
        if page.page_size == 0 {
            return Err(CosmoportError::InvalidInput);
        }
        let predicate = filter.to_predicate()?;
        self.store.find_page(&predicate, page)
    }

    /// Total number of ships matching `filter`.
    pub fn count(&self, filter: &ShipFilter) -> Result<u64> {
        let predicate = filter.to_predicate()?;
        self.store.count(&predicate)
    }

    /// Validate, rate, and persist a new ship.
    pub fn create(&self, draft: &ShipDraft) -> Result<Ship> {
        let ship = validate::new_ship(draft)?;
        let stored = self.store.insert(&ship)?;
        log::info!("created ship {} ({})", stored.id, stored.name);
        Ok(stored)
    }

    /// Fetch a ship by id.
    pub fn get(&self, id: i64) -> Result<Ship> {
        let id = ensure_positive(id)?;
        self.store.find(id)?.ok_or(CosmoportError::NotFound(id))
    }

    /// Apply a partial update and recompute the rating.
    ///
    /// A patch without any field returns the stored ship untouched.
    pub fn update(&self, id: i64, patch: &ShipDraft) -> Result<Ship> {
        let mut ship = self.get(id)?;
        if patch.is_empty() {
            return Ok(ship);
        }
        validate::apply_patch(&mut ship, patch)?;
        let saved = self.store.save(&ship)?;
        log::info!("updated ship {}", saved.id);
        Ok(saved)
    }

    /// Permanently remove a ship.
    pub fn delete(&self, id: i64) -> Result<()> {
        let id = ensure_positive(id)?;
        if !self.store.exists(id)? {
            return Err(CosmoportError::NotFound(id));
        }
        self.store.delete(id)?;
        log::info!("deleted ship {id}");
        Ok(())
    }
}
