//! KPI CRUD. A KPI is a short-term measurable linked to a quarterly goal,
//! e.g. "Run 15 miles per week".

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{Kpi, NewKpi};
use crate::schema::{kpis, quarterly_goals};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// How often the KPI is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct KpiRequest {
    pub quarterly_goal_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    /// Numeric target, e.g. 15 for "15 miles"
    pub target_value: Option<i32>,
    /// Unit of the target, e.g. "miles" or "dollars"
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiView {
    pub id: Uuid,
    pub quarterly_goal_id: Uuid,
    pub name: String,
    pub description: String,
    pub frequency: String,
    pub target_value: Option<i32>,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListKpisResponse {
    pub kpis: Vec<KpiView>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListKpisParams {
    /// Only KPIs under this quarterly goal
    pub quarterly_goal_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedKpiResponse {
    pub id: Uuid,
}

impl From<Kpi> for KpiView {
    fn from(kpi: Kpi) -> Self {
        Self {
            id: kpi.id,
            quarterly_goal_id: kpi.quarterly_goal_id,
            name: kpi.name,
            description: kpi.description,
            frequency: kpi.frequency,
            target_value: kpi.target_value,
            unit: kpi.unit,
        }
    }
}

fn quarterly_goal_owned(
    conn: &mut PgConnection,
    user_id: Uuid,
    quarterly_goal_id: Uuid,
) -> Result<bool, diesel::result::Error> {
    quarterly_goals::table
        .filter(quarterly_goals::id.eq(quarterly_goal_id))
        .filter(quarterly_goals::user_id.eq(user_id))
        .select(quarterly_goals::id)
        .first::<Uuid>(conn)
        .optional()
        .map(|found| found.is_some())
}

#[utoipa::path(
    post,
    path = "/api/kpis",
    tag = "kpis",
    request_body = KpiRequest,
    responses(
        (status = 201, description = "KPI created", body = CreatedKpiResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_kpi(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<KpiRequest>,
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

    let mut conn = get_conn!(pool);

    match quarterly_goal_owned(&mut conn, user.id, request.quarterly_goal_id) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Quarterly goal not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to verify quarterly goal ownership: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify quarterly goal".to_string(),
                }),
            )
                .into_response();
        }
    }

    let result = diesel::insert_into(kpis::table)
        .values(NewKpi {
            user_id: user.id,
            quarterly_goal_id: request.quarterly_goal_id,
            name: request.name.trim(),
            description: request.description.as_deref().unwrap_or(""),
            frequency: request.frequency.unwrap_or(Frequency::Daily).as_str(),
            target_value: request.target_value,
            unit: request.unit.as_deref().unwrap_or(""),
        })
        .returning(kpis::id)
        .get_result::<Uuid>(&mut conn);

    match result {
        Ok(id) => (StatusCode::CREATED, Json(CreatedKpiResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create KPI: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create KPI".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/kpis",
    tag = "kpis",
    params(ListKpisParams),
    responses(
        (status = 200, description = "The user's KPIs", body = ListKpisResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_kpis(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListKpisParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = kpis::table
        .filter(kpis::user_id.eq(user.id))
        .select(Kpi::as_select())
        .into_boxed();
    if let Some(goal_id) = params.quarterly_goal_id {
        query = query.filter(kpis::quarterly_goal_id.eq(goal_id));
    }

    match query.order(kpis::created_at.asc()).load::<Kpi>(&mut conn)
    {
        Ok(kpis) => (
            StatusCode::OK,
            Json(ListKpisResponse {
                kpis: kpis.into_iter().map(KpiView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list KPIs: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list KPIs".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/kpis/{id}",
    tag = "kpis",
    params(("id" = Uuid, Path, description = "KPI ID")),
    request_body = KpiRequest,
    responses(
        (status = 204, description = "KPI updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "KPI not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_kpi(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<KpiRequest>,
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

    let mut conn = get_conn!(pool);

    match quarterly_goal_owned(&mut conn, user.id, request.quarterly_goal_id) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Quarterly goal not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to verify quarterly goal ownership: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify quarterly goal".to_string(),
                }),
            )
                .into_response();
        }
    }

    let result = diesel::update(kpis::table.filter(kpis::id.eq(id)).filter(kpis::user_id.eq(user.id)))
        .set((
            kpis::quarterly_goal_id.eq(request.quarterly_goal_id),
            kpis::name.eq(request.name.trim()),
            kpis::description.eq(request.description.as_deref().unwrap_or("")),
            kpis::frequency.eq(request.frequency.unwrap_or(Frequency::Daily).as_str()),
            kpis::target_value.eq(request.target_value),
            kpis::unit.eq(request.unit.as_deref().unwrap_or("")),
        ))
        .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "KPI not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update KPI: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update KPI".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/kpis/{id}",
    tag = "kpis",
    params(("id" = Uuid, Path, description = "KPI ID")),
    responses(
        (status = 204, description = "KPI deleted"),
        (status = 404, description = "KPI not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_kpi(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::delete(
        kpis::table
            .filter(kpis::id.eq(id))
            .filter(kpis::user_id.eq(user.id)),
    )
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "KPI not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete KPI: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete KPI".to_string(),
                }),
            )
                .into_response()
        }
    }
}
