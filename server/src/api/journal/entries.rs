use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{JournalEntry, NewJournalEntry};
use crate::schema::journal_entries;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JournalEntryRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JournalEntryView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListJournalEntriesResponse {
    pub entries: Vec<JournalEntryView>,
}

impl From<JournalEntry> for JournalEntryView {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            content: entry.content,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/journal",
    tag = "journal",
    request_body = JournalEntryRequest,
    responses(
        (status = 201, description = "Journal entry created", body = JournalEntryView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_entry(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<JournalEntryRequest>,
) -> impl IntoResponse {
    if request.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Content cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result: Result<JournalEntry, _> = diesel::insert_into(journal_entries::table)
        .values(NewJournalEntry {
            user_id: user.id,
            content: &request.content,
        })
        .returning(JournalEntry::as_returning())
        .get_result(&mut conn);

    match result {
        Ok(entry) => (StatusCode::CREATED, Json(JournalEntryView::from(entry))).into_response(),
        Err(e) => {
            tracing::error!("Failed to create journal entry: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create journal entry".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/journal",
    tag = "journal",
    responses(
        (status = 200, description = "The user's journal entries, newest first", body = ListJournalEntriesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_entries(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match journal_entries::table
        .filter(journal_entries::user_id.eq(user.id))
        .order(journal_entries::created_at.desc())
        .select(JournalEntry::as_select())
        .load::<JournalEntry>(&mut conn)
    {
        Ok(entries) => (
            StatusCode::OK,
            Json(ListJournalEntriesResponse {
                entries: entries.into_iter().map(JournalEntryView::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to list journal entries: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list journal entries".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/journal/{id}",
    tag = "journal",
    params(("id" = Uuid, Path, description = "Journal entry ID")),
    request_body = JournalEntryRequest,
    responses(
        (status = 204, description = "Journal entry updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Journal entry not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_entry(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<JournalEntryRequest>,
) -> impl IntoResponse {
    if request.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Content cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let result = diesel::update(
        journal_entries::table
            .filter(journal_entries::id.eq(id))
            .filter(journal_entries::user_id.eq(user.id)),
    )
    .set(journal_entries::content.eq(&request.content))
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Journal entry not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to update journal entry: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update journal entry".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/journal/{id}",
    tag = "journal",
    params(("id" = Uuid, Path, description = "Journal entry ID")),
    responses(
        (status = 204, description = "Journal entry deleted"),
        (status = 404, description = "Journal entry not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_entry(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let result = diesel::delete(
        journal_entries::table
            .filter(journal_entries::id.eq(id))
            .filter(journal_entries::user_id.eq(user.id)),
    )
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Journal entry not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to delete journal entry: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete journal entry".to_string(),
                }),
            )
                .into_response()
        }
    }
}
