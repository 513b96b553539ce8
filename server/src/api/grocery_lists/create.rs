use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewGroceryList;
use crate::schema::grocery_lists;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateGroceryListRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateGroceryListResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/grocery-lists",
    tag = "grocery_lists",
    request_body = CreateGroceryListRequest,
    responses(
        (status = 201, description = "Grocery list created", body = CreateGroceryListResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_grocery_list(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateGroceryListRequest>,
) -> impl IntoResponse {
    if request.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Name cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    if request.end_date < request.start_date {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "End date must not be before start date".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(grocery_lists::table)
        .values(NewGroceryList {
            user_id: user.id,
            name: request.name.trim(),
            start_date: request.start_date,
            end_date: request.end_date,
        })
        .returning(grocery_lists::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreateGroceryListResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create grocery list: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create grocery list".to_string(),
                }),
            )
                .into_response()
        }
    }
}
