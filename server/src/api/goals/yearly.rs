//! Yearly goal CRUD. A yearly goal is a high-level aim for one year,
//! e.g. "Improve fitness and financial stability in 2025."

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewYearlyGoal, YearlyGoal};
use crate::schema::yearly_goals;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct YearlyGoalRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct YearlyGoalView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListYearlyGoalsResponse {
    pub goals: Vec<YearlyGoalView>,
}

impl From<YearlyGoal> for YearlyGoalView {
    fn from(goal: YearlyGoal) -> Self {
        Self {
            id: goal.id,
            title: goal.title,
            description: goal.description,
            start_date: goal.start_date,
            end_date: goal.end_date,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/yearly-goals",
    tag = "goals",
    request_body = YearlyGoalRequest,
    responses(
        (status = 201, description = "Yearly goal created", body = CreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_yearly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<YearlyGoalRequest>,
) -> impl IntoResponse {
    if request.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Title cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(yearly_goals::table)
        .values(NewYearlyGoal {
            user_id: user.id,
            title: request.title.trim(),
            description: request.description.as_deref().unwrap_or(""),
            start_date: request.start_date,
            end_date: request.end_date,
        })
        .returning(yearly_goals::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create yearly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create yearly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/yearly-goals",
    tag = "goals",
    responses(
        (status = 200, description = "The user's yearly goals", body = ListYearlyGoalsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_yearly_goals(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match yearly_goals::table
        .filter(yearly_goals::user_id.eq(user.id))
        .order(yearly_goals::start_date.asc())
        .select(YearlyGoal::as_select())
        .load::<YearlyGoal>(&mut conn)
    {
        Ok(goals) => (
            StatusCode::OK,
            Json(ListYearlyGoalsResponse {
                goals: goals.into_iter().map(YearlyGoalView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list yearly goals: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list yearly goals".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/yearly-goals/{id}",
    tag = "goals",
    params(("id" = Uuid, Path, description = "Yearly goal ID")),
    request_body = YearlyGoalRequest,
    responses(
        (status = 204, description = "Yearly goal updated"),
        (status = 404, description = "Yearly goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_yearly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<YearlyGoalRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::update(
        yearly_goals::table
            .filter(yearly_goals::id.eq(id))
            .filter(yearly_goals::user_id.eq(user.id)),
    )
    .set((
        yearly_goals::title.eq(request.title.trim()),
        yearly_goals::description.eq(request.description.as_deref().unwrap_or("")),
        yearly_goals::start_date.eq(request.start_date),
        yearly_goals::end_date.eq(request.end_date),
    ))
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Yearly goal not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update yearly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update yearly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/yearly-goals/{id}",
    tag = "goals",
    params(("id" = Uuid, Path, description = "Yearly goal ID")),
    responses(
        (status = 204, description = "Yearly goal deleted"),
        (status = 404, description = "Yearly goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_yearly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::delete(
        yearly_goals::table
            .filter(yearly_goals::id.eq(id))
            .filter(yearly_goals::user_id.eq(user.id)),
    )
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Yearly goal not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete yearly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete yearly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}
