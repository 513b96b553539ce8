pub mod quarterly;
pub mod yearly;

use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/yearly-goals endpoints
pub fn yearly_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(yearly::list_yearly_goals).post(yearly::create_yearly_goal),
        )
        .route(
            "/{id}",
            put(yearly::update_yearly_goal).delete(yearly::delete_yearly_goal),
        )
}

/// Returns the router for /api/quarterly-goals endpoints
pub fn quarterly_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(quarterly::list_quarterly_goals).post(quarterly::create_quarterly_goal),
        )
        .route(
            "/{id}",
            put(quarterly::update_quarterly_goal).delete(quarterly::delete_quarterly_goal),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        yearly::create_yearly_goal,
        yearly::list_yearly_goals,
        yearly::update_yearly_goal,
        yearly::delete_yearly_goal,
        quarterly::create_quarterly_goal,
        quarterly::list_quarterly_goals,
        quarterly::update_quarterly_goal,
        quarterly::delete_quarterly_goal,
    ),
    components(schemas(
        yearly::YearlyGoalRequest,
        yearly::YearlyGoalView,
        yearly::ListYearlyGoalsResponse,
        yearly::CreatedResponse,
        quarterly::QuarterlyGoalRequest,
        quarterly::QuarterlyGoalView,
        quarterly::ListQuarterlyGoalsResponse,
    ))
)]
pub struct ApiDoc;
