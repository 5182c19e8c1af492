#![deny(missing_docs)]
//! Cosmoport core library.
//!
//! Domain types, filtering, validation, and rating rules for the ship
//! registry, independent of any transport or database.

pub mod domain;
pub mod error;
pub mod filter;
pub mod rating;
pub mod service;
pub mod store;
pub mod validate;

pub use domain::{NewShip, PageRequest, Ship, ShipDraft, ShipOrder, ShipType};
pub use error::{CosmoportError, Result};
pub use filter::{Bounds, Criterion, Predicate, ShipFilter};
pub use rating::{rate, round2};
pub use service::{ShipService, parse_id};
pub use store::{MemoryShipStore, ShipStore, compare_ships};
