//! Field constraints for create and partial update requests.

use chrono::{DateTime, Utc};

use crate::domain::{NewShip, Ship, ShipDraft};
use crate::error::{CosmoportError, Result};
use crate::rating::{self, CURRENT_YEAR, production_year, round2};

/// Maximum length of names and planets, in characters.
pub const MAX_TEXT_LEN: usize = 50;
/// Earliest production year.
pub const MIN_PROD_YEAR: i32 = 2800;
/// Slowest allowed speed.
pub const MIN_SPEED: f64 = 0.01;
/// Fastest allowed speed.
pub const MAX_SPEED: f64 = 0.99;
/// Smallest allowed crew.
pub const MIN_CREW_SIZE: i32 = 1;
/// Largest allowed crew.
pub const MAX_CREW_SIZE: i32 = 9999;

fn reject(field: &str) -> CosmoportError {
    log::debug!("rejecting ship: {field} missing or out of range");
    CosmoportError::InvalidInput
}

fn require<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| reject(field))
}

fn text(value: &str, field: &str) -> Result<String> {
    let len = value.chars().count();
    if len == 0 || len > MAX_TEXT_LEN {
        return Err(reject(field));
    }
    Ok(value.to_string())
}

fn prod_date(value: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let year = production_year(&value);
    if !(MIN_PROD_YEAR..=CURRENT_YEAR).contains(&year) {
        return Err(reject("prodDate"));
    }
    Ok(value)
}

fn speed(value: f64) -> Result<f64> {
    if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
        return Err(reject("speed"));
    }
    Ok(round2(value))
}

fn crew_size(value: i32) -> Result<i32> {
    if !(MIN_CREW_SIZE..=MAX_CREW_SIZE).contains(&value) {
        return Err(reject("crewSize"));
    }
    Ok(value)
}

/// Validate a create request and compute its rating.
///
/// Every field except `isUsed` is required; `isUsed` defaults to `false`.
/// Any violation yields the same `InvalidInput` error.
pub fn new_ship(draft: &ShipDraft) -> Result<NewShip> {
    let name = text(require(draft.name.as_deref(), "name")?, "name")?;
    let planet = text(require(draft.planet.as_deref(), "planet")?, "planet")?;
    let ship_type = require(draft.ship_type, "shipType")?;
    let prod_date = prod_date(require(draft.prod_date, "prodDate")?)?;
    let speed = speed(require(draft.speed, "speed")?)?;
    let crew_size = crew_size(require(draft.crew_size, "crewSize")?)?;
    let is_used = draft.is_used.unwrap_or(false);
    let rating = rating::rate(speed, is_used, &prod_date)?;

    Ok(NewShip {
        name,
        planet,
        ship_type,
        prod_date,
        is_used,
        speed,
        crew_size,
        rating,
    })
}

/// Validate the supplied fields of a partial update and merge them into
/// `ship`, recomputing its rating.
///
/// All supplied fields are checked before anything is written, so a
/// rejected patch leaves `ship` untouched.
pub fn apply_patch(ship: &mut Ship, patch: &ShipDraft) -> Result<()> {
    let name = patch
        .name
        .as_deref()
        .map(|value| text(value, "name"))
        .transpose()?;
    let planet = patch
        .planet
        .as_deref()
        .map(|value| text(value, "planet"))
        .transpose()?;
    let prod_date = patch.prod_date.map(prod_date).transpose()?;
    let speed = patch.speed.map(speed).transpose()?;
    let crew_size = patch.crew_size.map(crew_size).transpose()?;

    let mut updated = ship.clone();
    if let Some(name) = name {
        updated.name = name;
    }
    if let Some(planet) = planet {
        updated.planet = planet;
    }
    if let Some(ship_type) = patch.ship_type {
        updated.ship_type = ship_type;
    }
    if let Some(prod_date) = prod_date {
        updated.prod_date = prod_date;
    }
    if let Some(is_used) = patch.is_used {
        updated.is_used = is_used;
    }
    if let Some(speed) = speed {
        updated.speed = speed;
    }
    if let Some(crew_size) = crew_size {
        updated.crew_size = crew_size;
    }
    rating::rerate(&mut updated)?;
    *ship = updated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShipType;
    use chrono::TimeZone;

    fn prod(year: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, 6, 15, 12, 0, 0).unwrap()
    }

    fn enterprise() -> ShipDraft {
        ShipDraft {
            name: Some("Enterprise".to_string()),
            planet: Some("Earth".to_string()),
            ship_type: Some(ShipType::Military),
            prod_date: Some(prod(2900)),
            is_used: None,
            speed: Some(0.5),
            crew_size: Some(100),
        }
    }

    #[test]
    fn valid_draft_defaults_used_and_rates() {
        let ship = new_ship(&enterprise()).expect("valid");
        assert!(!ship.is_used);
        assert_eq!(ship.rating, 0.33);
        assert_eq!(ship.name, "Enterprise");
    }

    #[test]
    fn speed_is_rounded_before_rating() {
        let draft = ShipDraft {
            speed: Some(0.456),
            ..enterprise()
        };
        let ship = new_ship(&draft).expect("valid");
        assert_eq!(ship.speed, 0.46);
    }

    #[test]
    fn each_missing_field_is_rejected() {
        let cases = [
            ShipDraft { name: None, ..enterprise() },
            ShipDraft { planet: None, ..enterprise() },
            ShipDraft { ship_type: None, ..enterprise() },
            ShipDraft { prod_date: None, ..enterprise() },
            ShipDraft { speed: None, ..enterprise() },
            ShipDraft { crew_size: None, ..enterprise() },
        ];
        for draft in cases {
            assert_eq!(new_ship(&draft), Err(CosmoportError::InvalidInput));
        }
    }

    #[test]
    fn out_of_range_fields_are_rejected() {
        let cases = [
            ShipDraft { name: Some(String::new()), ..enterprise() },
            ShipDraft { planet: Some("p".repeat(51)), ..enterprise() },
            ShipDraft { prod_date: Some(prod(2799)), ..enterprise() },
            ShipDraft { prod_date: Some(prod(3020)), ..enterprise() },
            ShipDraft { speed: Some(1.0), ..enterprise() },
            ShipDraft { speed: Some(0.0), ..enterprise() },
            ShipDraft { crew_size: Some(0), ..enterprise() },
            ShipDraft { crew_size: Some(10_000), ..enterprise() },
        ];
        for draft in cases {
            assert_eq!(new_ship(&draft), Err(CosmoportError::InvalidInput));
        }
    }

    #[test]
    fn boundary_values_are_accepted() {
        let draft = ShipDraft {
            name: Some("n".repeat(50)),
            prod_date: Some(prod(3019)),
            speed: Some(0.99),
            crew_size: Some(9999),
            ..enterprise()
        };
        let ship = new_ship(&draft).expect("valid");
        assert_eq!(ship.rating, 79.2);
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let mut ship = new_ship(&enterprise()).expect("valid").with_id(1);
        let patch = ShipDraft {
            is_used: Some(true),
            ..ShipDraft::default()
        };
        apply_patch(&mut ship, &patch).expect("patch");
        assert!(ship.is_used);
        assert_eq!(ship.name, "Enterprise");
        assert_eq!(ship.rating, 0.17);
    }

    #[test]
    fn rejected_patch_leaves_ship_untouched() {
        let mut ship = new_ship(&enterprise()).expect("valid").with_id(1);
        let before = ship.clone();
        let patch = ShipDraft {
            name: Some("Voyager".to_string()),
            crew_size: Some(0),
            ..ShipDraft::default()
        };
        assert_eq!(
            apply_patch(&mut ship, &patch),
            Err(CosmoportError::InvalidInput)
        );
        assert_eq!(ship, before);
    }

    #[test]
    fn patch_rejects_empty_planet() {
        let mut ship = new_ship(&enterprise()).expect("valid").with_id(1);
        let patch = ShipDraft {
            planet: Some(String::new()),
            ..ShipDraft::default()
        };
        assert_eq!(
            apply_patch(&mut ship, &patch),
            Err(CosmoportError::InvalidInput)
        );
    }
}
