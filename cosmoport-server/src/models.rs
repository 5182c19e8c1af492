//! Database models for the Cosmoport server.

use chrono::{DateTime, Utc};
use cosmoport_core::{CosmoportError, NewShip, Ship};
use diesel::prelude::*;

use crate::schema::ships;

#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = ships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
/// Ship database record.
pub struct ShipRecord {
    /// Ship identifier.
    pub id: i64,
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = ships)]
/// Insertable or updatable ship columns, everything except the id.
pub struct ShipColumns {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Ship type label.
    pub ship_type: String,
    /// Production timestamp.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl TryFrom<ShipRecord> for Ship {
    type Error = CosmoportError;

    fn try_from(record: ShipRecord) -> Result<Self, Self::Error> {
        let ship_type = record.ship_type.parse().map_err(|_| {
            CosmoportError::Store(format!(
                "ship {} has unknown type {:?}",
                record.id, record.ship_type
            ))
        })?;
        Ok(Ship {
            id: record.id,
            name: record.name,
            planet: record.planet,
            ship_type,
            prod_date: record.prod_date,
            is_used: record.is_used,
            speed: record.speed,
            crew_size: record.crew_size,
            rating: record.rating,
        })
    }
}

impl From<&NewShip> for ShipColumns {
    fn from(ship: &NewShip) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}

impl From<&Ship> for ShipColumns {
    fn from(ship: &Ship) -> Self {
        Self {
            name: ship.name.clone(),
            planet: ship.planet.clone(),
            ship_type: ship.ship_type.as_str().to_string(),
            prod_date: ship.prod_date,
            is_used: ship.is_used,
            speed: ship.speed,
            crew_size: ship.crew_size,
            rating: ship.rating,
        }
    }
}
