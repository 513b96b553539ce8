pub mod create;
pub mod delete;
pub mod generate;
pub mod items;
pub mod list;

use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/grocery-lists endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_grocery_lists).post(create::create_grocery_list),
        )
        .route("/{id}", axum::routing::delete(delete::delete_grocery_list))
        .route("/{id}/generate", post(generate::generate_from_meal_plans))
}

/// Returns the router for /api/grocery-items endpoints
pub fn items_router() -> Router<AppState> {
    Router::new().route("/{id}", put(items::update_grocery_item))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_grocery_list,
        list::list_grocery_lists,
        delete::delete_grocery_list,
        generate::generate_from_meal_plans,
        items::update_grocery_item,
    ),
    components(schemas(
        create::CreateGroceryListRequest,
        create::CreateGroceryListResponse,
        list::GroceryItemView,
        list::GroceryListView,
        list::ListGroceryListsResponse,
        generate::GenerateResponse,
        items::UpdateGroceryItemRequest,
    ))
)]
pub struct ApiDoc;
