use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::GroceryItem;
use crate::schema::{grocery_items, grocery_lists};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Partial update; omitted fields keep their current values.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateGroceryItemRequest {
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub purchased: Option<bool>,
    pub notes: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/grocery-items/{id}",
    tag = "grocery_lists",
    params(("id" = Uuid, Path, description = "Grocery item ID")),
    request_body = UpdateGroceryItemRequest,
    responses(
        (status = 204, description = "Grocery item updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Grocery item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_grocery_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGroceryItemRequest>,
) -> impl IntoResponse {
    if request.quantity.is_some_and(|q| q < 0.0) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Quantity must not be negative".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    // Ownership runs through the item's list
    let item: GroceryItem = match grocery_items::table
        .inner_join(grocery_lists::table)
        .filter(grocery_items::id.eq(id))
        .filter(grocery_lists::user_id.eq(user.id))
        .select(GroceryItem::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(item)) => item,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Grocery item not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load grocery item: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update grocery item".to_string(),
                }),
            )
                .into_response();
        }
    };

    let result = diesel::update(grocery_items::table.filter(grocery_items::id.eq(item.id)))
        .set((
            grocery_items::quantity.eq(request.quantity.unwrap_or(item.quantity)),
            grocery_items::unit.eq(request.unit.as_deref().unwrap_or(&item.unit)),
            grocery_items::purchased.eq(request.purchased.unwrap_or(item.purchased)),
            grocery_items::notes.eq(request.notes.as_deref().unwrap_or(&item.notes)),
        ))
        .execute(&mut conn);

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update grocery item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update grocery item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
