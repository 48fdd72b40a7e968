/// Recipe write path
///
/// Each write is one transaction: the recipe row, any newly created tags and
/// ingredients, and every association change commit together or not at all.
/// Payloads are fully validated before the transaction opens.
///
/// Nested collections follow the field-presence rule:
///
/// | payload field      | effect on links                  |
/// |--------------------|----------------------------------|
/// | absent or `null`   | untouched                        |
/// | `[]`               | all links of that kind removed   |
/// | `[{name}, ...]`    | links replaced by exactly these  |
///
/// Ingredients are reconciled before tags.

use sqlx::PgPool;
use uuid::Uuid;

use super::payload::{FieldError, RecipePayload, WriteMode};
use super::read::{load_detail, RecipeDetail};
use super::reconcile::{self, ReconcileError};
use crate::models::ingredient::Ingredient;
use crate::models::recipe::Recipe;
use crate::models::tag::Tag;

/// Errors from recipe writes
#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("Invalid recipe payload")]
    Validation(Vec<FieldError>),

    #[error("Recipe not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Creates a recipe owned by `user_id`, with its nested entities
pub async fn create_recipe(
    pool: &PgPool,
    user_id: Uuid,
    payload: RecipePayload,
) -> Result<RecipeDetail, RecipeError> {
    let validated = payload
        .validate_for(WriteMode::Create)
        .map_err(RecipeError::Validation)?;

    let new_recipe = validated.new_recipe().ok_or_else(|| {
        RecipeError::Validation(vec![FieldError::new("title", "This field is required.")])
    })?;

    let mut tx = pool.begin().await?;

    let recipe = Recipe::insert(&mut *tx, user_id, new_recipe).await?;

    if let Some(names) = &validated.ingredients {
        reconcile::attach_all::<Ingredient>(&mut *tx, user_id, recipe.id, names).await?;
    }
    if let Some(names) = &validated.tags {
        reconcile::attach_all::<Tag>(&mut *tx, user_id, recipe.id, names).await?;
    }

    let detail = load_detail(&mut *tx, recipe).await?;
    tx.commit().await?;

    tracing::info!(recipe_id = detail.id(), user_id = %user_id, "Recipe created");

    Ok(detail)
}

/// Updates one of the owner's recipes
///
/// `mode` is [`WriteMode::Patch`] for partial updates and
/// [`WriteMode::Replace`] for full ones. The row is locked for the duration
/// so concurrent updates to the same recipe serialize.
pub async fn update_recipe(
    pool: &PgPool,
    user_id: Uuid,
    id: i64,
    payload: RecipePayload,
    mode: WriteMode,
) -> Result<RecipeDetail, RecipeError> {
    let validated = payload.validate_for(mode).map_err(RecipeError::Validation)?;

    let mut tx = pool.begin().await?;

    let mut recipe = Recipe::lock_owned(&mut *tx, id, user_id)
        .await?
        .ok_or(RecipeError::NotFound)?;

    if !validated.changes.is_empty() {
        recipe = Recipe::apply_changes(&mut *tx, recipe.id, validated.changes).await?;
    }

    if let Some(names) = &validated.ingredients {
        reconcile::replace::<Ingredient>(&mut *tx, user_id, recipe.id, names).await?;
    }
    if let Some(names) = &validated.tags {
        reconcile::replace::<Tag>(&mut *tx, user_id, recipe.id, names).await?;
    }

    let detail = load_detail(&mut *tx, recipe).await?;
    tx.commit().await?;

    tracing::info!(recipe_id = id, user_id = %user_id, ?mode, "Recipe updated");

    Ok(detail)
}

/// Deletes one of the owner's recipes
///
/// Tags and ingredients it referenced are kept.
pub async fn delete_recipe(pool: &PgPool, user_id: Uuid, id: i64) -> Result<(), RecipeError> {
    if !Recipe::delete_owned(pool, id, user_id).await? {
        return Err(RecipeError::NotFound);
    }

    tracing::info!(recipe_id = id, user_id = %user_id, "Recipe deleted");

    Ok(())
}
