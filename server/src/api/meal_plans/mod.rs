pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/meal-plans endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_meal_plans).post(create::create_meal_plan))
        .route(
            "/{id}",
            axum::routing::put(update::update_meal_plan).delete(delete::delete_meal_plan),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_meal_plan,
        list::list_meal_plans,
        update::update_meal_plan,
        delete::delete_meal_plan,
    ),
    components(schemas(
        create::CreateMealPlanRequest,
        create::CreateMealPlanResponse,
        list::MealType,
        list::MealPlanView,
        list::ListMealPlansResponse,
        update::UpdateMealPlanRequest,
    ))
)]
pub struct ApiDoc;
