use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::persist;
use crate::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use skillet_core::ExtractionOutcome;
use std::sync::Arc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ExtractFromUrlRequest {
    /// URL of the recipe page to extract
    pub url: String,
}

/// Extract a recipe from a URL and persist it.
///
/// The response body is newline-delimited JSON: zero or one intermediate
/// object `{"status": ..., "intermediate": true}` while the pipeline falls
/// back to the language model, then exactly one final object - either the
/// saved recipe fields plus `id` and `status`, or `error` and `status`.
#[utoipa::path(
    post,
    path = "/api/recipes/extract-from-url",
    tag = "recipes",
    request_body = ExtractFromUrlRequest,
    responses(
        (status = 200, description = "Streamed extraction progress and result"),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn extract_from_url(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ExtractFromUrlRequest>,
) -> impl IntoResponse {
    // Validate the URL before any network activity
    let valid_scheme = match reqwest::Url::parse(&request.url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    };
    if !valid_scheme {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid URL format".to_string(),
            }),
        )
            .into_response();
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    let pipeline = state.pipeline.clone();
    let pool = state.pool.clone();
    let url = request.url.clone();
    let user_id = user.id;

    // The extraction runs to completion within this request; the channel
    // carries progress lines onto the response stream as they happen.
    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let outcome = pipeline
            .run_with_progress(&url, move |status| {
                let line =
                    serde_json::json!({ "status": status, "intermediate": true }).to_string();
                let _ = progress_tx.send(line + "\n");
            })
            .await;

        let final_payload = build_final_payload(&pool, user_id, &url, outcome);
        let _ = tx.send(final_payload.to_string() + "\n");
    });

    let stream = UnboundedReceiverStream::new(rx).map(Ok::<_, std::convert::Infallible>);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Persist a successful extraction and shape the final stream object.
///
/// A persistence failure attaches `save_error` to the otherwise-successful
/// payload instead of discarding the extraction.
fn build_final_payload(
    pool: &Arc<crate::db::DbPool>,
    user_id: Uuid,
    url: &str,
    outcome: ExtractionOutcome,
) -> serde_json::Value {
    let recipe = match outcome {
        ExtractionOutcome::Structured(recipe) | ExtractionOutcome::LanguageModel(recipe) => recipe,
        ExtractionOutcome::Failed(failure) => {
            return serde_json::json!({
                "error": failure.error,
                "status": failure.status,
            });
        }
    };

    let mut payload = serde_json::to_value(&recipe).unwrap_or_else(|_| serde_json::json!({}));

    match persist::save_extracted_recipe(pool, user_id, url, &recipe) {
        Ok(recipe_id) => {
            payload["id"] = serde_json::json!(recipe_id);
        }
        Err(e) => {
            tracing::error!(url, "Failed to save extracted recipe: {}", e);
            payload["save_error"] = serde_json::json!(e.to_string());
        }
    }

    payload
}
