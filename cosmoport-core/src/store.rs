//! Record store abstraction and an in-memory implementation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, RwLock};

use crate::domain::{NewShip, PageRequest, Ship, ShipOrder};
use crate::error::{CosmoportError, Result};
use crate::filter::Predicate;

/// Persistence for ship records.
#[cfg_attr(test, mockall::automock)]
pub trait ShipStore {
    /// Ships matching `predicate`, sorted ascending by `page.order` (ties by
    /// id) and sliced to the requested page.
    fn find_page(&self, predicate: &Predicate, page: &PageRequest) -> Result<Vec<Ship>>;
    /// Number of ships matching `predicate`.
    fn count(&self, predicate: &Predicate) -> Result<u64>;
    /// Look up a ship by id.
    fn find(&self, id: i64) -> Result<Option<Ship>>;
    /// Whether a ship with this id exists.
    fn exists(&self, id: i64) -> Result<bool>;
    /// Persist a new ship and return it with its assigned id.
    fn insert(&self, ship: &NewShip) -> Result<Ship>;
    /// Overwrite an existing ship.
    fn save(&self, ship: &Ship) -> Result<Ship>;
    /// Remove a ship.
    fn delete(&self, id: i64) -> Result<()>;
}

impl<T: ShipStore + ?Sized> ShipStore for Arc<T> {
    fn find_page(&self, predicate: &Predicate, page: &PageRequest) -> Result<Vec<Ship>> {
        (**self).find_page(predicate, page)
    }

    fn count(&self, predicate: &Predicate) -> Result<u64> {
        (**self).count(predicate)
    }

    fn find(&self, id: i64) -> Result<Option<Ship>> {
        (**self).find(id)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        (**self).exists(id)
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        (**self).insert(ship)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        (**self).save(ship)
    }

    fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id)
    }
}

/// Sort two ships by the requested order, breaking ties by id.
pub fn compare_ships(order: ShipOrder, left: &Ship, right: &Ship) -> Ordering {
    let primary = match order {
        ShipOrder::Id => Ordering::Equal,
        ShipOrder::Speed => left.speed.total_cmp(&right.speed),
        ShipOrder::Date => left.prod_date.cmp(&right.prod_date),
        ShipOrder::Rating => left.rating.total_cmp(&right.rating),
        ShipOrder::CrewSize => left.crew_size.cmp(&right.crew_size),
    };
    primary.then_with(|| left.id.cmp(&right.id))
}

/// Ship store kept in process memory.
#[derive(Debug)]
pub struct MemoryShipStore {
    ships: RwLock<BTreeMap<i64, Ship>>,
    next_id: AtomicI64,
}

impl Default for MemoryShipStore {
    fn default() -> Self {
        Self {
            ships: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryShipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn unavailable<E>(_: E) -> CosmoportError {
    CosmoportError::Store("ship store unavailable".to_string())
}

impl ShipStore for MemoryShipStore {
    fn find_page(&self, predicate: &Predicate, page: &PageRequest) -> Result<Vec<Ship>> {
        let ships = self.ships.read().map_err(unavailable)?;
        let mut matching: Vec<&Ship> = ships
            .values()
            .filter(|ship| predicate.matches(ship))
            .collect();
        matching.sort_by(|left, right| compare_ships(page.order, left, right));
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(page.page_size as usize)
            .cloned()
            .collect())
    }

    fn count(&self, predicate: &Predicate) -> Result<u64> {
        let ships = self.ships.read().map_err(unavailable)?;
        Ok(ships.values().filter(|ship| predicate.matches(ship)).count() as u64)
    }

    fn find(&self, id: i64) -> Result<Option<Ship>> {
        let ships = self.ships.read().map_err(unavailable)?;
        Ok(ships.get(&id).cloned())
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let ships = self.ships.read().map_err(unavailable)?;
        Ok(ships.contains_key(&id))
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut ships = self.ships.write().map_err(unavailable)?;
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let stored = ship.clone().with_id(id);
        ships.insert(id, stored.clone());
        Ok(stored)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut ships = self.ships.write().map_err(unavailable)?;
        match ships.get_mut(&ship.id) {
            Some(existing) => {
                *existing = ship.clone();
                Ok(ship.clone())
            }
            None => Err(CosmoportError::NotFound(ship.id)),
        }
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut ships = self.ships.write().map_err(unavailable)?;
        ships
            .remove(&id)
            .map(|_| ())
            .ok_or(CosmoportError::NotFound(id))
    }
}
