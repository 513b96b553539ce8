use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::GroceryList;
use crate::schema::{grocery_items, grocery_lists, ingredients};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroceryItemView {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub purchased: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroceryListView {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub items: Vec<GroceryItemView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListGroceryListsResponse {
    pub grocery_lists: Vec<GroceryListView>,
}

#[utoipa::path(
    get,
    path = "/api/grocery-lists",
    tag = "grocery_lists",
    responses(
        (status = 200, description = "The user's grocery lists with items", body = ListGroceryListsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_grocery_lists(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let lists: Vec<GroceryList> = match grocery_lists::table
        .filter(grocery_lists::user_id.eq(user.id))
        .order(grocery_lists::start_date.desc())
        .select(GroceryList::as_select())
        .load(&mut conn)
    {
        Ok(lists) => lists,
        Err(e) => {
            tracing::error!("Failed to list grocery lists: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list grocery lists".to_string(),
                }),
            )
                .into_response();
        }
    };

    let list_ids: Vec<Uuid> = lists.iter().map(|l| l.id).collect();

    type ItemRow = (Uuid, Uuid, Uuid, String, f64, String, bool, String);
    let items: Vec<ItemRow> = match grocery_items::table
        .inner_join(ingredients::table)
        .filter(grocery_items::grocery_list_id.eq_any(&list_ids))
        .order(ingredients::name.asc())
        .select((
            grocery_items::id,
            grocery_items::grocery_list_id,
            grocery_items::ingredient_id,
            ingredients::name,
            grocery_items::quantity,
            grocery_items::unit,
            grocery_items::purchased,
            grocery_items::notes,
        ))
        .load(&mut conn)
    {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Failed to load grocery items: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list grocery lists".to_string(),
                }),
            )
                .into_response();
        }
    };

    let grocery_lists = lists
        .into_iter()
        .map(|list| {
            let list_items = items
                .iter()
                .filter(|row| row.1 == list.id)
                .map(|row| GroceryItemView {
                    id: row.0,
                    ingredient_id: row.2,
                    ingredient_name: row.3.clone(),
                    quantity: row.4,
                    unit: row.5.clone(),
                    purchased: row.6,
                    notes: row.7.clone(),
                })
                .collect();
            GroceryListView {
                id: list.id,
                name: list.name,
                start_date: list.start_date,
                end_date: list.end_date,
                items: list_items,
            }
        })
        .collect();

    (
        StatusCode::OK,
        Json(ListGroceryListsResponse { grocery_lists }),
    )
        .into_response()
}
