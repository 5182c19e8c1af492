//! HTTP handlers for the Cosmoport server.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use cosmoport_core::{
    CosmoportError, PageRequest, Ship, ShipDraft, ShipFilter, ShipService, ShipStore, parse_id,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

/// Record store shared across worker threads.
pub type SharedStore = Arc<dyn ShipStore + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship query and mutation service.
    pub ships: ShipService<SharedStore>,
}

impl AppState {
    /// Build state around a record store.
    pub fn new(store: SharedStore) -> Self {
        Self {
            ships: ShipService::new(store),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn error_response(err: &CosmoportError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        CosmoportError::InvalidInput => HttpResponse::BadRequest().json(body),
        CosmoportError::NotFound(_) => HttpResponse::NotFound().json(body),
        CosmoportError::Store(message) => {
            log::error!("ship store failure: {message}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Run a blocking service call off the async executor and map its outcome.
async fn run_blocking<T, F, R>(call: F, respond: R) -> HttpResponse
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CosmoportError> + Send + 'static,
    R: FnOnce(T) -> HttpResponse,
{
    match web::block(call).await {
        Ok(Ok(value)) => respond(value),
        Ok(Err(err)) => error_response(&err),
        Err(err) => HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        }),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipFilter, PageRequest),
    responses(
        (status = 200, description = "One page of matching ships", body = [Ship]),
        (status = 400, description = "Invalid filter or paging", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filters, one page at a time.
pub async fn list_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilter>,
    page: web::Query<PageRequest>,
) -> impl Responder {
    let ships = state.ships.clone();
    let filter = filter.into_inner();
    let page = page.into_inner();
    run_blocking(
        move || ships.list(&filter, &page),
        |found| HttpResponse::Ok().json(found),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipFilter),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filters.
pub async fn count_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilter>,
) -> impl Responder {
    let ships = state.ships.clone();
    let filter = filter.into_inner();
    run_blocking(
        move || ships.count(&filter),
        |total| HttpResponse::Ok().json(total),
    )
    .await
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid ship", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let ships = state.ships.clone();
    let draft = payload.into_inner();
    run_blocking(
        move || ships.create(&draft),
        |ship| HttpResponse::Ok().json(ship),
    )
    .await
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by id.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let ships = state.ships.clone();
    run_blocking(move || ships.get(id), |ship| HttpResponse::Ok().json(ship)).await
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid id or field", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Partially update a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let ships = state.ships.clone();
    let patch = payload.into_inner();
    run_blocking(
        move || ships.update(id, &patch),
        |ship| HttpResponse::Ok().json(ship),
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Permanently delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let ships = state.ships.clone();
    run_blocking(move || ships.delete(id), |()| HttpResponse::Ok().finish()).await
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Register every handler. The count route precedes `{id}` routes so that
/// `/rest/ships/count` is not read as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(count_ships)
        .service(openapi_json)
        .service(list_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship);
}
