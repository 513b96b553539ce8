//! Recipe persistence: maps a normalized extraction result into recipe,
//! ingredient, and join rows.

use diesel::prelude::*;
use skillet_core::{split_ingredient, NormalizedRecipe};
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbPool;
use crate::models::{NewIngredient, NewRecipe, NewRecipeIngredient};
use crate::schema::{ingredients, recipe_ingredients, recipes};

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Database connection unavailable: {0}")]
    Pool(String),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Save an extracted recipe with its ingredient rows.
///
/// Ingredient names are get-or-create by exact trimmed name, shared across
/// users. There is no pre-check for duplicate (recipe, ingredient) pairs;
/// the table's unique constraint surfaces those as a database error, which
/// rolls back the whole save.
pub fn save_extracted_recipe(
    pool: &DbPool,
    user_id: Uuid,
    source_url: &str,
    recipe: &NormalizedRecipe,
) -> Result<Uuid, PersistError> {
    let mut conn = pool.get().map_err(|e| PersistError::Pool(e.to_string()))?;

    let recipe_id = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            user_id,
            title: &recipe.title,
            description: &recipe.description,
            instructions: &recipe.instructions,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            servings: recipe.servings,
            source_url: Some(source_url),
            image_url: recipe.image_url.as_deref(),
        };

        let recipe_id: Uuid = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        for line in &recipe.ingredients {
            let parsed = split_ingredient(line);
            if parsed.name.is_empty() {
                continue;
            }

            let ingredient_id = get_or_create_ingredient(conn, &parsed.name)?;

            diesel::insert_into(recipe_ingredients::table)
                .values(&NewRecipeIngredient {
                    recipe_id,
                    ingredient_id,
                    quantity: parsed.quantity,
                    unit: &parsed.unit,
                    notes: "",
                })
                .execute(conn)?;
        }

        Ok::<_, diesel::result::Error>(recipe_id)
    })?;

    tracing::info!(%recipe_id, "saved extracted recipe");
    Ok(recipe_id)
}

/// Look up an ingredient by exact name, creating it on miss.
///
/// Select-then-insert without a uniqueness constraint: two concurrent
/// extractions can create duplicate names.
fn get_or_create_ingredient(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Uuid, diesel::result::Error> {
    let name = name.trim();

    let existing: Option<Uuid> = ingredients::table
        .filter(ingredients::name.eq(name))
        .select(ingredients::id)
        .first(conn)
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    diesel::insert_into(ingredients::table)
        .values(&NewIngredient {
            name,
            description: "",
        })
        .returning(ingredients::id)
        .get_result(conn)
}

/// Find a recipe the user already saved from this URL.
pub fn find_recipe_by_source_url(
    pool: &DbPool,
    user_id: Uuid,
    url: &str,
) -> Result<Option<(Uuid, String)>, PersistError> {
    let mut conn = pool.get().map_err(|e| PersistError::Pool(e.to_string()))?;

    let found = recipes::table
        .filter(recipes::user_id.eq(user_id))
        .filter(recipes::source_url.eq(url))
        .select((recipes::id, recipes::title))
        .first::<(Uuid, String)>(&mut conn)
        .optional()?;

    Ok(found)
}
