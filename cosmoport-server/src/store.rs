//! PostgreSQL-backed ship store.

use cosmoport_core::{
    Bounds, CosmoportError, Criterion, NewShip, PageRequest, Predicate, Result, Ship, ShipOrder,
    ShipStore,
};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::OptionalExtension;

use crate::db::DbPool;
use crate::models::{ShipColumns, ShipRecord};
use crate::schema::ships;

type ShipQuery = ships::BoxedQuery<'static, Pg>;

fn store_error(err: impl std::fmt::Display) -> CosmoportError {
    CosmoportError::Store(err.to_string())
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn apply_criterion(query: ShipQuery, criterion: &Criterion) -> ShipQuery {
    match criterion {
        Criterion::NameContains(needle) => query.filter(ships::name.like(like_pattern(needle))),
        Criterion::PlanetContains(needle) => {
            query.filter(ships::planet.like(like_pattern(needle)))
        }
        Criterion::ShipTypeIs(ship_type) => {
            query.filter(ships::ship_type.eq(ship_type.as_str()))
        }
        Criterion::ProdDateWithin(Bounds { min, max }) => {
            let query = match min {
                Some(min) => query.filter(ships::prod_date.ge(*min)),
                None => query,
            };
            match max {
                Some(max) => query.filter(ships::prod_date.le(*max)),
                None => query,
            }
        }
        Criterion::UsedIs(is_used) => query.filter(ships::is_used.eq(*is_used)),
        Criterion::SpeedWithin(Bounds { min, max }) => {
            let query = match min {
                Some(min) => query.filter(ships::speed.ge(*min)),
                None => query,
            };
            match max {
                Some(max) => query.filter(ships::speed.le(*max)),
                None => query,
            }
        }
        Criterion::CrewSizeWithin(Bounds { min, max }) => {
            let query = match min {
                Some(min) => query.filter(ships::crew_size.ge(*min)),
                None => query,
            };
            match max {
                Some(max) => query.filter(ships::crew_size.le(*max)),
                None => query,
            }
        }
        Criterion::RatingWithin(Bounds { min, max }) => {
            let query = match min {
                Some(min) => query.filter(ships::rating.ge(*min)),
                None => query,
            };
            match max {
                Some(max) => query.filter(ships::rating.le(*max)),
                None => query,
            }
        }
    }
}

/// Translate a predicate into a WHERE clause over the ships table.
fn filtered(predicate: &Predicate) -> ShipQuery {
    predicate
        .criteria()
        .iter()
        .fold(ships::table.into_boxed(), apply_criterion)
}

fn ordered(query: ShipQuery, order: ShipOrder) -> ShipQuery {
    let query = match order {
        ShipOrder::Id => query,
        ShipOrder::Speed => query.order_by(ships::speed.asc()),
        ShipOrder::Date => query.order_by(ships::prod_date.asc()),
        ShipOrder::Rating => query.order_by(ships::rating.asc()),
        ShipOrder::CrewSize => query.order_by(ships::crew_size.asc()),
    };
    query.then_order_by(ships::id.asc())
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| CosmoportError::InvalidInput)
}

/// Ship store issuing SQL through a Diesel connection pool.
#[derive(Clone)]
pub struct PgShipStore {
    pool: DbPool,
}

impl PgShipStore {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(store_error)
    }
}

impl ShipStore for PgShipStore {
    fn find_page(&self, predicate: &Predicate, page: &PageRequest) -> Result<Vec<Ship>> {
        let mut conn = self.conn()?;
        let records = ordered(filtered(predicate), page.order)
            .limit(i64::from(page.page_size))
            .offset(to_i64(page.offset())?)
            .load::<ShipRecord>(&mut conn)
            .map_err(store_error)?;
        records.into_iter().map(Ship::try_from).collect()
    }

    fn count(&self, predicate: &Predicate) -> Result<u64> {
        let mut conn = self.conn()?;
        let total: i64 = filtered(predicate)
            .count()
            .get_result(&mut conn)
            .map_err(store_error)?;
        Ok(total.max(0) as u64)
    }

    fn find(&self, id: i64) -> Result<Option<Ship>> {
        let mut conn = self.conn()?;
        ships::table
            .find(id)
            .select(ShipRecord::as_select())
            .first::<ShipRecord>(&mut conn)
            .optional()
            .map_err(store_error)?
            .map(Ship::try_from)
            .transpose()
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        diesel::select(diesel::dsl::exists(ships::table.find(id)))
            .get_result(&mut conn)
            .map_err(store_error)
    }

    fn insert(&self, ship: &NewShip) -> Result<Ship> {
        let mut conn = self.conn()?;
        let record = diesel::insert_into(ships::table)
            .values(ShipColumns::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result::<ShipRecord>(&mut conn)
            .map_err(store_error)?;
        Ship::try_from(record)
    }

    fn save(&self, ship: &Ship) -> Result<Ship> {
        let mut conn = self.conn()?;
        diesel::update(ships::table.find(ship.id))
            .set(ShipColumns::from(ship))
            .returning(ShipRecord::as_returning())
            .get_result::<ShipRecord>(&mut conn)
            .optional()
            .map_err(store_error)?
            .ok_or(CosmoportError::NotFound(ship.id))
            .and_then(Ship::try_from)
    }

    fn delete(&self, id: i64) -> Result<()> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(ships::table.find(id))
            .execute(&mut conn)
            .map_err(store_error)?;
        if removed == 0 {
            return Err(CosmoportError::NotFound(id));
        }
        Ok(())
    }
}
