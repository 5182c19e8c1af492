//! Domain entities for the ship registry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::CosmoportError;

/// Hull classification of a ship.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShipType {
    /// Cargo and passenger carrier.
    Transport,
    /// Armed vessel.
    Military,
    /// Trading vessel.
    Merchant,
}

impl ShipType {
    /// Stable upper-case label used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipType::Transport => "TRANSPORT",
            ShipType::Military => "MILITARY",
            ShipType::Merchant => "MERCHANT",
        }
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipType {
    type Err = CosmoportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TRANSPORT" => Ok(ShipType::Transport),
            "MILITARY" => Ok(ShipType::Military),
            "MERCHANT" => Ok(ShipType::Merchant),
            _ => Err(CosmoportError::InvalidInput),
        }
    }
}

/// A stored ship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    /// Store-assigned identifier.
    pub id: i64,
    /// Ship name, 1 to 50 characters.
    pub name: String,
    /// Planet the ship is based at, 1 to 50 characters.
    pub planet: String,
    /// Hull classification.
    pub ship_type: ShipType,
    /// Production date, transmitted as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub prod_date: DateTime<Utc>,
    /// Whether the ship has had a previous owner.
    pub is_used: bool,
    /// Maximum speed, rounded to hundredths.
    pub speed: f64,
    /// Number of crew members.
    pub crew_size: i32,
    /// Derived rating, rounded to hundredths.
    pub rating: f64,
}

/// A validated ship ready to be persisted. The store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShip {
    /// Ship name.
    pub name: String,
    /// Home planet.
    pub planet: String,
    /// Hull classification.
    pub ship_type: ShipType,
    /// Production date.
    pub prod_date: DateTime<Utc>,
    /// Used flag.
    pub is_used: bool,
    /// Speed rounded to hundredths.
    pub speed: f64,
    /// Crew size.
    pub crew_size: i32,
    /// Derived rating.
    pub rating: f64,
}

impl NewShip {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Ship {
        Ship {
            id,
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date: self.prod_date,
            is_used: self.is_used,
            speed: self.speed,
            crew_size: self.crew_size,
            rating: self.rating,
        }
    }
}

/// Client-supplied ship fields.
///
/// Used as the create body, where every field except `isUsed` is required,
/// and as the partial update body, where every field is optional. Any `id`
/// or `rating` sent by the client is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShipDraft {
    /// Ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Home planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Hull classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Production date as epoch milliseconds.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub prod_date: Option<DateTime<Utc>>,
    /// Used flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Maximum speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Crew size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crew_size: Option<i32>,
}

impl ShipDraft {
    /// Whether no mutable field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.planet.is_none()
            && self.ship_type.is_none()
            && self.prod_date.is_none()
            && self.is_used.is_none()
            && self.speed.is_none()
            && self.crew_size.is_none()
    }
}

/// Sortable ship fields.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipOrder {
    /// Sort by id.
    #[default]
    Id,
    /// Sort by speed.
    Speed,
    /// Sort by production date.
    Date,
    /// Sort by rating.
    Rating,
    /// Sort by crew size.
    CrewSize,
}

impl ShipOrder {
    /// Name of the ship field this order sorts by.
    pub fn field_name(&self) -> &'static str {
        match self {
            ShipOrder::Id => "id",
            ShipOrder::Speed => "speed",
            ShipOrder::Date => "prodDate",
            ShipOrder::Rating => "rating",
            ShipOrder::CrewSize => "crewSize",
        }
    }
}

impl FromStr for ShipOrder {
    type Err = CosmoportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ID" => Ok(ShipOrder::Id),
            "SPEED" => Ok(ShipOrder::Speed),
            "DATE" => Ok(ShipOrder::Date),
            "RATING" => Ok(ShipOrder::Rating),
            "CREW_SIZE" => Ok(ShipOrder::CrewSize),
            _ => Err(CosmoportError::InvalidInput),
        }
    }
}

/// Sorting and paging parameters for listing ships.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Field to sort by, ascending.
    pub order: ShipOrder,
    /// Zero-based page index.
    pub page_number: u32,
    /// Number of ships per page.
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            order: ShipOrder::Id,
            page_number: 0,
            page_size: 3,
        }
    }
}

impl PageRequest {
    /// Number of records skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}
