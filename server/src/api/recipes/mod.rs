pub mod check_url;
pub mod create;
pub mod delete;
pub mod extract;
pub mod get;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/extract-from-url", post(extract::extract_from_url))
        .route("/check-url", post(check_url::check_url))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        extract::extract_from_url,
        check_url::check_url,
    ),
    components(schemas(
        create::CreateRecipeRequest,
        create::CreateRecipeResponse,
        list::ListRecipesResponse,
        list::RecipeSummary,
        get::RecipeResponse,
        get::RecipeIngredientView,
        update::UpdateRecipeRequest,
        extract::ExtractFromUrlRequest,
        check_url::CheckUrlRequest,
        check_url::CheckUrlResponse,
        check_url::ExistingRecipe,
    ))
)]
pub struct ApiDoc;
