pub mod handlers;
pub mod records;

use crate::AppState;
use axum::routing::{delete, get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/kpis endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_kpis).post(handlers::create_kpi))
        .route("/{id}", put(handlers::update_kpi).delete(handlers::delete_kpi))
}

/// Returns the router for /api/kpi-records endpoints
pub fn records_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(records::list_kpi_records).post(records::create_kpi_record),
        )
        .route("/{id}", delete(records::delete_kpi_record))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_kpi,
        handlers::list_kpis,
        handlers::update_kpi,
        handlers::delete_kpi,
        records::create_kpi_record,
        records::list_kpi_records,
        records::delete_kpi_record,
    ),
    components(schemas(
        handlers::Frequency,
        handlers::KpiRequest,
        handlers::KpiView,
        handlers::ListKpisResponse,
        handlers::CreatedKpiResponse,
        records::KpiRecordRequest,
        records::KpiRecordView,
        records::ListKpiRecordsResponse,
    ))
)]
pub struct ApiDoc;
