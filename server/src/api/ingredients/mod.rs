pub mod list;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/ingredients endpoints
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_ingredients))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_ingredients),
    components(schemas(list::IngredientView, list::ListIngredientsResponse))
)]
pub struct ApiDoc;
