//! Derived ship rating.
//!
//! The rating rewards fast, new, recently produced ships:
//!
//! ```text
//! rating = round2(80 * speed * k / (3019 - year + 1))
//! ```
//!
//! where `k` is `0.5` for used ships and `1.0` otherwise, and `year` is the
//! production year in the local time zone.

use chrono::{DateTime, Datelike, Local, Utc};

use crate::domain::Ship;
use crate::error::{CosmoportError, Result};

/// Latest production year a ship may carry.
pub const CURRENT_YEAR: i32 = 3019;

const SPEED_WEIGHT: f64 = 80.0;
const USED_FACTOR: f64 = 0.5;
const NEW_FACTOR: f64 = 1.0;

/// Round half-up to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Production year of a date in the local time zone.
pub fn production_year(prod_date: &DateTime<Utc>) -> i32 {
    prod_date.with_timezone(&Local).year()
}

/// Compute the rating for the given inputs.
///
/// Fails with `InvalidInput` when the production year lies after
/// [`CURRENT_YEAR`].
pub fn rate(speed: f64, is_used: bool, prod_date: &DateTime<Utc>) -> Result<f64> {
    let year = production_year(prod_date);
    if year > CURRENT_YEAR {
        log::debug!("refusing to rate ship produced in {year}");
        return Err(CosmoportError::InvalidInput);
    }
    let k = if is_used { USED_FACTOR } else { NEW_FACTOR };
    let age = f64::from(CURRENT_YEAR - year + 1);
    Ok(round2(SPEED_WEIGHT * speed * k / age))
}

/// Recompute the rating of a ship from its current fields.
pub fn rerate(ship: &mut Ship) -> Result<()> {
    ship.rating = rate(ship.speed, ship.is_used, &ship.prod_date)?;
    Ok(())
}
