use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{GroceryList, NewGroceryItem};
use crate::schema::{grocery_items, grocery_lists, meal_plans, recipe_ingredients, recipes};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub items_created: usize,
}

/// Fill a grocery list from the meal plans in its date range.
///
/// Replaces the list's current items with the recipe ingredients of every
/// planned meal between start_date and end_date, quantities summed per
/// (ingredient, unit).
#[utoipa::path(
    post,
    path = "/api/grocery-lists/{id}/generate",
    tag = "grocery_lists",
    params(("id" = Uuid, Path, description = "Grocery list ID")),
    responses(
        (status = 200, description = "Items generated", body = GenerateResponse),
        (status = 404, description = "Grocery list not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_from_meal_plans(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let list: GroceryList = match grocery_lists::table
        .filter(grocery_lists::id.eq(id))
        .filter(grocery_lists::user_id.eq(user.id))
        .select(GroceryList::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(list)) => list,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Grocery list not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load grocery list: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate grocery list".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Every ingredient row of every meal planned in the list's date range
    let rows: Vec<(Uuid, f64, String)> = match meal_plans::table
        .inner_join(recipes::table.inner_join(recipe_ingredients::table))
        .filter(meal_plans::user_id.eq(user.id))
        .filter(meal_plans::meal_date.ge(list.start_date))
        .filter(meal_plans::meal_date.le(list.end_date))
        .select((
            recipe_ingredients::ingredient_id,
            recipe_ingredients::quantity,
            recipe_ingredients::unit,
        ))
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to collect planned ingredients: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate grocery list".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Sum quantities per (ingredient, unit); different units stay separate
    let mut totals: BTreeMap<(Uuid, String), f64> = BTreeMap::new();
    for (ingredient_id, quantity, unit) in rows {
        *totals.entry((ingredient_id, unit)).or_insert(0.0) += quantity;
    }

    let items_created = totals.len();

    let result = conn.transaction(|conn| {
        diesel::delete(grocery_items::table.filter(grocery_items::grocery_list_id.eq(list.id)))
            .execute(conn)?;

        for ((ingredient_id, unit), quantity) in &totals {
            diesel::insert_into(grocery_items::table)
                .values(NewGroceryItem {
                    grocery_list_id: list.id,
                    ingredient_id: *ingredient_id,
                    quantity: *quantity,
                    unit: unit.as_str(),
                    notes: "",
                })
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(())
    });

    match result {
        Ok(()) => (StatusCode::OK, Json(GenerateResponse { items_created })).into_response(),
        Err(e) => {
            tracing::error!("Failed to write grocery items: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate grocery list".to_string(),
                }),
            )
                .into_response()
        }
    }
}
