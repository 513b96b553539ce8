use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::persist;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckUrlRequest {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExistingRecipe {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckUrlResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<ExistingRecipe>,
}

/// Check whether the user already saved a recipe from this URL.
#[utoipa::path(
    post,
    path = "/api/recipes/check-url",
    tag = "recipes",
    request_body = CheckUrlRequest,
    responses(
        (status = 200, description = "Whether a recipe with this source URL exists", body = CheckUrlResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_url(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CheckUrlRequest>,
) -> impl IntoResponse {
    if reqwest::Url::parse(&request.url).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid URL format".to_string(),
            }),
        )
            .into_response();
    }

    match persist::find_recipe_by_source_url(&pool, user.id, &request.url) {
        Ok(Some((id, title))) => (
            StatusCode::OK,
            Json(CheckUrlResponse {
                exists: true,
                recipe: Some(ExistingRecipe { id, title }),
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(CheckUrlResponse {
                exists: false,
                recipe: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to check recipe URL: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check URL".to_string(),
                }),
            )
                .into_response()
        }
    }
}
