//! Composable ship predicates built from optional query parameters.
//!
//! Every query parameter group is turned into at most one [`Criterion`]. A
//! missing group contributes nothing, so a [`Predicate`] with no criteria
//! matches every ship. Criteria are plain values: the in-memory store
//! evaluates them with [`Predicate::matches`] and SQL stores translate them
//! into WHERE clauses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Ship, ShipType};
use crate::error::{CosmoportError, Result};

/// Inclusive bounds where either side may be open.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds<T> {
    /// Lower bound, inclusive.
    pub min: Option<T>,
    /// Upper bound, inclusive.
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Build bounds, or `None` when neither side is given.
    pub fn new(min: Option<T>, max: Option<T>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self { min, max })
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// A single constraint over ship fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Name contains the substring, case-sensitive.
    NameContains(String),
    /// Planet contains the substring, case-sensitive.
    PlanetContains(String),
    /// Ship type equals the value.
    ShipTypeIs(ShipType),
    /// Production date lies within the bounds.
    ProdDateWithin(Bounds<DateTime<Utc>>),
    /// Used flag equals the value.
    UsedIs(bool),
    /// Speed lies within the bounds.
    SpeedWithin(Bounds<f64>),
    /// Crew size lies within the bounds.
    CrewSizeWithin(Bounds<i32>),
    /// Rating lies within the bounds.
    RatingWithin(Bounds<f64>),
}

impl Criterion {
    /// Evaluate the criterion against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        match self {
            Criterion::NameContains(needle) => ship.name.contains(needle.as_str()),
            Criterion::PlanetContains(needle) => ship.planet.contains(needle.as_str()),
            Criterion::ShipTypeIs(ship_type) => ship.ship_type == *ship_type,
            Criterion::ProdDateWithin(bounds) => bounds.contains(ship.prod_date),
            Criterion::UsedIs(is_used) => ship.is_used == *is_used,
            Criterion::SpeedWithin(bounds) => bounds.contains(ship.speed),
            Criterion::CrewSizeWithin(bounds) => bounds.contains(ship.crew_size),
            Criterion::RatingWithin(bounds) => bounds.contains(ship.rating),
        }
    }
}

/// Conjunction of criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    criteria: Vec<Criterion>,
}

impl Predicate {
    /// A predicate that imposes no restriction.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an optional criterion; `None` leaves the predicate unchanged.
    pub fn with(mut self, criterion: Option<Criterion>) -> Self {
        self.criteria.extend(criterion);
        self
    }

    /// Logical AND of two predicates.
    pub fn and(mut self, other: Predicate) -> Self {
        self.criteria.extend(other.criteria);
        self
    }

    /// Criteria in the order they were added.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Whether the predicate imposes no restriction.
    pub fn is_unrestricted(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Evaluate every criterion against a ship.
    pub fn matches(&self, ship: &Ship) -> bool {
        self.criteria
            .iter()
            .fold(true, |matched, criterion| matched && criterion.matches(ship))
    }
}

/// Optional filter parameters accepted by list and count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShipFilter {
    /// Substring of the ship name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Substring of the planet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planet: Option<String>,
    /// Exact ship type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type: Option<ShipType>,
    /// Earliest production date, epoch milliseconds, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Latest production date, epoch milliseconds, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    /// Exact used flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    /// Minimum speed, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    /// Maximum speed, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Minimum crew size, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_crew_size: Option<i32>,
    /// Maximum crew size, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_crew_size: Option<i32>,
    /// Minimum rating, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Maximum rating, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<f64>,
}

impl ShipFilter {
    /// Build the conjunction of every supplied sub-filter.
    ///
    /// Fails with `InvalidInput` only when a date bound is outside the
    /// representable range.
    pub fn to_predicate(&self) -> Result<Predicate> {
        Ok(Predicate::all()
            .with(name_filter(self.name.as_deref()))
            .with(planet_filter(self.planet.as_deref()))
            .with(self.ship_type.map(Criterion::ShipTypeIs))
            .with(prod_date_filter(self.after, self.before)?)
            .with(self.is_used.map(Criterion::UsedIs))
            .with(Bounds::new(self.min_speed, self.max_speed).map(Criterion::SpeedWithin))
            .with(
                Bounds::new(self.min_crew_size, self.max_crew_size)
                    .map(Criterion::CrewSizeWithin),
            )
            .with(Bounds::new(self.min_rating, self.max_rating).map(Criterion::RatingWithin)))
    }
}

fn name_filter(name: Option<&str>) -> Option<Criterion> {
    name.map(|name| Criterion::NameContains(name.to_string()))
}

fn planet_filter(planet: Option<&str>) -> Option<Criterion> {
    planet.map(|planet| Criterion::PlanetContains(planet.to_string()))
}

fn prod_date_filter(after: Option<i64>, before: Option<i64>) -> Result<Option<Criterion>> {
    let after = after.map(from_millis).transpose()?;
    let before = before.map(from_millis).transpose()?;
    Ok(Bounds::new(after, before).map(Criterion::ProdDateWithin))
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(CosmoportError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ship(name: &str, speed: f64, crew_size: i32) -> Ship {
        Ship {
            id: 1,
            name: name.to_string(),
            planet: "Mars".to_string(),
            ship_type: ShipType::Transport,
            prod_date: Utc.with_ymd_and_hms(2950, 3, 1, 0, 0, 0).unwrap(),
            is_used: false,
            speed,
            crew_size,
            rating: 0.5,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let predicate = ShipFilter::default().to_predicate().expect("predicate");
        assert!(predicate.is_unrestricted());
        assert!(predicate.matches(&ship("Orion", 0.3, 10)));
    }

    #[test]
    fn name_filter_is_case_sensitive_substring() {
        let filter = ShipFilter {
            name: Some("rio".to_string()),
            ..ShipFilter::default()
        };
        let predicate = filter.to_predicate().expect("predicate");
        assert!(predicate.matches(&ship("Orion", 0.3, 10)));
        assert!(!predicate.matches(&ship("RIOT", 0.3, 10)));
    }

    #[test]
    fn empty_string_filter_imposes_no_restriction() {
        let filter = ShipFilter {
            planet: Some(String::new()),
            ..ShipFilter::default()
        };
        let predicate = filter.to_predicate().expect("predicate");
        assert!(predicate.matches(&ship("Orion", 0.3, 10)));
    }

    #[test]
    fn bounds_handle_open_and_closed_ranges() {
        assert!(Bounds::<i32>::new(None, None).is_none());

        let min_only = Bounds::new(Some(5), None).expect("bounds");
        assert!(min_only.contains(5));
        assert!(min_only.contains(9999));
        assert!(!min_only.contains(4));

        let max_only = Bounds::new(None, Some(5)).expect("bounds");
        assert!(max_only.contains(1));
        assert!(!max_only.contains(6));

        let closed = Bounds::new(Some(2), Some(5)).expect("bounds");
        assert!(closed.contains(2));
        assert!(closed.contains(5));
        assert!(!closed.contains(6));
    }

    #[test]
    fn date_bounds_are_inclusive_milliseconds() {
        let sample = ship("Orion", 0.3, 10);
        let millis = sample.prod_date.timestamp_millis();
        let filter = ShipFilter {
            after: Some(millis),
            before: Some(millis),
            ..ShipFilter::default()
        };
        assert!(filter.to_predicate().expect("predicate").matches(&sample));

        let later = ShipFilter {
            after: Some(millis + 1),
            ..ShipFilter::default()
        };
        assert!(!later.to_predicate().expect("predicate").matches(&sample));
    }

    #[test]
    fn unrepresentable_date_is_invalid_input() {
        let filter = ShipFilter {
            before: Some(i64::MAX),
            ..ShipFilter::default()
        };
        assert_eq!(filter.to_predicate(), Err(CosmoportError::InvalidInput));
    }

    #[test]
    fn all_sub_filters_are_conjoined() {
        let filter = ShipFilter {
            ship_type: Some(ShipType::Transport),
            is_used: Some(false),
            min_speed: Some(0.2),
            max_crew_size: Some(50),
            min_rating: Some(0.5),
            ..ShipFilter::default()
        };
        let predicate = filter.to_predicate().expect("predicate");
        assert_eq!(predicate.criteria().len(), 5);
        assert!(predicate.matches(&ship("Orion", 0.3, 10)));
        assert!(!predicate.matches(&ship("Orion", 0.1, 10)));
        assert!(!predicate.matches(&ship("Orion", 0.3, 51)));
    }

    #[test]
    fn and_is_associative() {
        let a = Predicate::all().with(Some(Criterion::UsedIs(false)));
        let b = Predicate::all().with(Some(Criterion::NameContains("O".to_string())));
        let c = Predicate::all().with(Bounds::new(Some(1), None).map(Criterion::CrewSizeWithin));
        let left = a.clone().and(b.clone()).and(c.clone());
        let right = a.and(b.and(c));
        assert_eq!(left, right);
        assert!(left.matches(&ship("Orion", 0.3, 10)));
    }
}
