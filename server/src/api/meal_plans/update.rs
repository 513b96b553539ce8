use super::list::MealType;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::meal_plans;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMealPlanRequest {
    pub meal_date: NaiveDate,
    pub meal_type: MealType,
    pub servings: Option<i32>,
    pub notes: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/meal-plans/{id}",
    tag = "meal_plans",
    params(("id" = Uuid, Path, description = "Meal plan ID")),
    request_body = UpdateMealPlanRequest,
    responses(
        (status = 204, description = "Meal plan updated"),
        (status = 404, description = "Meal plan not found", body = ErrorResponse),
        (status = 409, description = "Duplicate meal plan entry", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_meal_plan(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMealPlanRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::update(
        meal_plans::table
            .filter(meal_plans::id.eq(id))
            .filter(meal_plans::user_id.eq(user.id)),
    )
    .set((
        meal_plans::meal_date.eq(request.meal_date),
        meal_plans::meal_type.eq(request.meal_type.as_str()),
        meal_plans::servings.eq(request.servings.unwrap_or(1).max(1)),
        meal_plans::notes.eq(request.notes.as_deref().unwrap_or("")),
    ))
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Meal plan not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "This recipe is already planned for this meal".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update meal plan: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update meal plan".to_string(),
                }),
            )
                .into_response()
        }
    }
}
