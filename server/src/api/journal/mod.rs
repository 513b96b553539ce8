pub mod entries;

use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/journal endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(entries::list_entries).post(entries::create_entry))
        .route(
            "/{id}",
            put(entries::update_entry).delete(entries::delete_entry),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        entries::create_entry,
        entries::list_entries,
        entries::update_entry,
        entries::delete_entry,
    ),
    components(schemas(
        entries::JournalEntryRequest,
        entries::JournalEntryView,
        entries::ListJournalEntriesResponse,
    ))
)]
pub struct ApiDoc;
