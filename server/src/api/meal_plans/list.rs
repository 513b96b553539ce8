use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{meal_plans, recipes};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// The meal slot a recipe is planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMealPlansParams {
    /// Only plans on or after this date
    pub from: Option<NaiveDate>,
    /// Only plans on or before this date
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MealPlanView {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_title: String,
    pub meal_date: NaiveDate,
    pub meal_type: String,
    pub servings: i32,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListMealPlansResponse {
    pub meal_plans: Vec<MealPlanView>,
}

#[utoipa::path(
    get,
    path = "/api/meal-plans",
    tag = "meal_plans",
    params(ListMealPlansParams),
    responses(
        (status = 200, description = "The user's meal plans", body = ListMealPlansResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_meal_plans(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListMealPlansParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = meal_plans::table
        .inner_join(recipes::table)
        .filter(meal_plans::user_id.eq(user.id))
        .select((
            meal_plans::id,
            meal_plans::recipe_id,
            recipes::title,
            meal_plans::meal_date,
            meal_plans::meal_type,
            meal_plans::servings,
            meal_plans::notes,
        ))
        .into_boxed();

    if let Some(from) = params.from {
        query = query.filter(meal_plans::meal_date.ge(from));
    }
    if let Some(to) = params.to {
        query = query.filter(meal_plans::meal_date.le(to));
    }

    let rows: Result<Vec<(Uuid, Uuid, String, NaiveDate, String, i32, String)>, _> = query
        .order((meal_plans::meal_date.asc(), meal_plans::meal_type.asc()))
        .load(&mut conn);

    match rows {
        Ok(rows) => {
            let meal_plans = rows
                .into_iter()
                .map(
                    |(id, recipe_id, recipe_title, meal_date, meal_type, servings, notes)| {
                        MealPlanView {
                            id,
                            recipe_id,
                            recipe_title,
                            meal_date,
                            meal_type,
                            servings,
                            notes,
                        }
                    },
                )
                .collect();
            (StatusCode::OK, Json(ListMealPlansResponse { meal_plans })).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to list meal plans: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list meal plans".to_string(),
                }),
            )
                .into_response()
        }
    }
}
