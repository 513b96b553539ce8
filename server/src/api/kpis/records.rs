//! KPI record CRUD. A record is one dated measurement toward a KPI;
//! one record per KPI per day.

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{KpiRecord, NewKpiRecord};
use crate::schema::{kpi_records, kpis};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct KpiRecordRequest {
    pub kpi_id: Uuid,
    pub entry_date: NaiveDate,
    pub value: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct KpiRecordView {
    pub id: Uuid,
    pub kpi_id: Uuid,
    pub entry_date: NaiveDate,
    pub value: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListKpiRecordsResponse {
    pub records: Vec<KpiRecordView>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListKpiRecordsParams {
    /// Only records for this KPI
    pub kpi_id: Option<Uuid>,
}

impl From<KpiRecord> for KpiRecordView {
    fn from(record: KpiRecord) -> Self {
        Self {
            id: record.id,
            kpi_id: record.kpi_id,
            entry_date: record.entry_date,
            value: record.value,
            notes: record.notes,
        }
    }
}

fn kpi_owned(
    conn: &mut PgConnection,
    user_id: Uuid,
    kpi_id: Uuid,
) -> Result<bool, diesel::result::Error> {
    kpis::table
        .filter(kpis::id.eq(kpi_id))
        .filter(kpis::user_id.eq(user_id))
        .select(kpis::id)
        .first::<Uuid>(conn)
        .optional()
        .map(|found| found.is_some())
}

#[utoipa::path(
    post,
    path = "/api/kpi-records",
    tag = "kpis",
    request_body = KpiRecordRequest,
    responses(
        (status = 201, description = "KPI record created", body = KpiRecordView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "A record for this KPI and date already exists", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_kpi_record(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<KpiRecordRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match kpi_owned(&mut conn, user.id, request.kpi_id) {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "KPI not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to verify KPI ownership: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to verify KPI".to_string(),
                }),
            )
                .into_response();
        }
    }

    let result: Result<KpiRecord, DieselError> = diesel::insert_into(kpi_records::table)
        .values(NewKpiRecord {
            kpi_id: request.kpi_id,
            entry_date: request.entry_date,
            value: request.value,
            notes: request.notes.as_deref().unwrap_or(""),
        })
        .returning(KpiRecord::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(record) => {
            (StatusCode::CREATED, Json(KpiRecordView::from(record))).into_response()
        }
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "A record for this KPI and date already exists".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create KPI record: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create KPI record".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/kpi-records",
    tag = "kpis",
    params(ListKpiRecordsParams),
    responses(
        (status = 200, description = "The user's KPI records", body = ListKpiRecordsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_kpi_records(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListKpiRecordsParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let mut query = kpi_records::table
        .inner_join(kpis::table)
        .filter(kpis::user_id.eq(user.id))
        .select(KpiRecord::as_select())
        .into_boxed();
    if let Some(kpi_id) = params.kpi_id {
        query = query.filter(kpi_records::kpi_id.eq(kpi_id));
    }

    match query
        .order(kpi_records::entry_date.desc())
        .load::<KpiRecord>(&mut conn)
    {
        Ok(records) => (
            StatusCode::OK,
            Json(ListKpiRecordsResponse {
                records: records.into_iter().map(KpiRecordView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list KPI records: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list KPI records".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/kpi-records/{id}",
    tag = "kpis",
    params(("id" = Uuid, Path, description = "KPI record ID")),
    responses(
        (status = 204, description = "KPI record deleted"),
        (status = 404, description = "KPI record not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_kpi_record(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // Ownership runs through the parent KPI
    let owned: Option<Uuid> = match kpi_records::table
        .inner_join(kpis::table)
        .filter(kpi_records::id.eq(id))
        .filter(kpis::user_id.eq(user.id))
        .select(kpi_records::id)
        .first(&mut conn)
        .optional()
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to load KPI record: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete KPI record".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(record_id) = owned else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "KPI record not found".to_string(),
            }),
        )
            .into_response();
    };

    match diesel::delete(kpi_records::table.filter(kpi_records::id.eq(record_id)))
        .execute(&mut conn)
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete KPI record: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete KPI record".to_string(),
                }),
            )
                .into_response()
        }
    }
}
