//! Quarterly goal CRUD. Breaks a yearly goal into quarter-focused goals
//! per life sector; the parent yearly goal is optional.

use super::yearly::CreatedResponse;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewQuarterlyGoal, QuarterlyGoal};
use crate::schema::{quarterly_goals, yearly_goals};
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
pub struct QuarterlyGoalRequest {
    pub yearly_goal_id: Option<Uuid>,
    /// Quarter of the year, 1 through 4
    pub quarter: i16,
    pub life_sector: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuarterlyGoalView {
    pub id: Uuid,
    pub yearly_goal_id: Option<Uuid>,
    pub quarter: i16,
    pub life_sector: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListQuarterlyGoalsResponse {
    pub goals: Vec<QuarterlyGoalView>,
}

impl From<QuarterlyGoal> for QuarterlyGoalView {
    fn from(goal: QuarterlyGoal) -> Self {
        Self {
            id: goal.id,
            yearly_goal_id: goal.yearly_goal_id,
            quarter: goal.quarter,
            life_sector: goal.life_sector,
            description: goal.description,
            start_date: goal.start_date,
            end_date: goal.end_date,
        }
    }
}

/// Validate the request and confirm any parent yearly goal belongs to the
/// user. Returns an error response to send back, or None when valid.
fn validate_request(
    conn: &mut PgConnection,
    user_id: Uuid,
    request: &QuarterlyGoalRequest,
) -> Option<(StatusCode, String)> {
    if !(1..=4).contains(&request.quarter) {
        return Some((
            StatusCode::BAD_REQUEST,
            "Quarter must be between 1 and 4".to_string(),
        ));
    }

    if request.life_sector.trim().is_empty() {
        return Some((
            StatusCode::BAD_REQUEST,
            "Life sector cannot be empty".to_string(),
        ));
    }

    if let Some(yearly_goal_id) = request.yearly_goal_id {
        let owned = yearly_goals::table
            .filter(yearly_goals::id.eq(yearly_goal_id))
            .filter(yearly_goals::user_id.eq(user_id))
            .select(yearly_goals::id)
            .first::<Uuid>(conn)
            .optional();
        match owned {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Some((
                    StatusCode::BAD_REQUEST,
                    "Yearly goal not found".to_string(),
                ))
            }
            Err(e) => {
                tracing::error!("Failed to verify yearly goal ownership: {}", e);
                return Some((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to verify yearly goal".to_string(),
                ));
            }
        }
    }

    None
}

#[utoipa::path(
    post,
    path = "/api/quarterly-goals",
    tag = "goals",
    request_body = QuarterlyGoalRequest,
    responses(
        (status = 201, description = "Quarterly goal created", body = CreatedResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_quarterly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<QuarterlyGoalRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    if let Some((status, error)) = validate_request(&mut conn, user.id, &request) {
        return (status, Json(ErrorResponse { error })).into_response();
    }

    let result = diesel::insert_into(quarterly_goals::table)
        .values(NewQuarterlyGoal {
            user_id: user.id,
            yearly_goal_id: request.yearly_goal_id,
            quarter: request.quarter,
            life_sector: request.life_sector.trim(),
            description: request.description.as_deref().unwrap_or(""),
            start_date: request.start_date,
            end_date: request.end_date,
        })
        .returning(quarterly_goals::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create quarterly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create quarterly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/quarterly-goals",
    tag = "goals",
    responses(
        (status = 200, description = "The user's quarterly goals", body = ListQuarterlyGoalsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_quarterly_goals(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match quarterly_goals::table
        .filter(quarterly_goals::user_id.eq(user.id))
        .order(quarterly_goals::start_date.asc())
        .select(QuarterlyGoal::as_select())
        .load::<QuarterlyGoal>(&mut conn)
    {
        Ok(goals) => (
            StatusCode::OK,
            Json(ListQuarterlyGoalsResponse {
                goals: goals.into_iter().map(QuarterlyGoalView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list quarterly goals: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list quarterly goals".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/quarterly-goals/{id}",
    tag = "goals",
    params(("id" = Uuid, Path, description = "Quarterly goal ID")),
    request_body = QuarterlyGoalRequest,
    responses(
        (status = 204, description = "Quarterly goal updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Quarterly goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_quarterly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<QuarterlyGoalRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    if let Some((status, error)) = validate_request(&mut conn, user.id, &request) {
        return (status, Json(ErrorResponse { error })).into_response();
    }

    let result = diesel::update(
        quarterly_goals::table
            .filter(quarterly_goals::id.eq(id))
            .filter(quarterly_goals::user_id.eq(user.id)),
    )
    .set((
        quarterly_goals::yearly_goal_id.eq(request.yearly_goal_id),
        quarterly_goals::quarter.eq(request.quarter),
        quarterly_goals::life_sector.eq(request.life_sector.trim()),
        quarterly_goals::description.eq(request.description.as_deref().unwrap_or("")),
        quarterly_goals::start_date.eq(request.start_date),
        quarterly_goals::end_date.eq(request.end_date),
    ))
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Quarterly goal not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update quarterly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update quarterly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/quarterly-goals/{id}",
    tag = "goals",
    params(("id" = Uuid, Path, description = "Quarterly goal ID")),
    responses(
        (status = 204, description = "Quarterly goal deleted"),
        (status = 404, description = "Quarterly goal not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_quarterly_goal(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::delete(
        quarterly_goals::table
            .filter(quarterly_goals::id.eq(id))
            .filter(quarterly_goals::user_id.eq(user.id)),
    )
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Quarterly goal not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete quarterly goal: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete quarterly goal".to_string(),
                }),
            )
                .into_response()
        }
    }
}
