/// Recipe endpoints
///
/// All recipe routes are scoped to the authenticated user. A recipe owned by
/// someone else answers exactly like a missing one (404).
///
/// # Endpoints
///
/// - `GET /v1/recipes` - List own recipes, newest first
/// - `POST /v1/recipes` - Create a recipe with nested tags/ingredients
/// - `GET /v1/recipes/:id` - Recipe detail
/// - `PATCH /v1/recipes/:id` - Partial update
/// - `PUT /v1/recipes/:id` - Full update
/// - `DELETE /v1/recipes/:id` - Delete
///
/// # Nested collections
///
/// ```json
/// {
///   "title": "Avocado lime cheesecake",
///   "time_minutes": 60,
///   "price": "20.00",
///   "tags": [{ "name": "Vegan" }, { "name": "Dessert" }],
///   "ingredients": [{ "name": "Avocado" }]
/// }
/// ```
///
/// Names the user already has are reused; new ones are created. On update an
/// omitted collection is left alone and `[]` clears it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use recipebox_shared::{
    auth::middleware::AuthContext,
    recipes::{self, RecipeDetail, RecipePayload, RecipeSummary, WriteMode},
};

/// Lists the requester's recipes in summary shape
pub async fn list_recipes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<RecipeSummary>>> {
    let recipes = recipes::list_recipes(&state.db, auth.user_id).await?;
    Ok(Json(recipes))
}

/// Creates a recipe owned by the requester
///
/// # Endpoint
///
/// ```text
/// POST /v1/recipes
/// Authorization: Bearer <access token>
/// ```
///
/// # Response
///
/// `201 Created` with the detail shape.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON
/// - `422 Unprocessable Entity`: Validation failed; nothing is stored
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    let Json(payload) = payload?;

    let recipe = recipes::create_recipe(&state.db, auth.user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Returns one of the requester's recipes in detail shape
pub async fn get_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RecipeDetail>> {
    recipes::get_recipe(&state.db, id, auth.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Recipe not found".to_string()))
}

/// Partial update: only provided fields change
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/recipes/:id
/// Authorization: Bearer <access token>
///
/// { "title": "New title" }
/// ```
pub async fn patch_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeDetail>> {
    update(state, auth, id, payload, WriteMode::Patch).await
}

/// Full update: `title`, `time_minutes` and `price` are required
///
/// Optional fields that are omitted keep their stored values, including
/// nested collections.
pub async fn put_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<RecipePayload>, JsonRejection>,
) -> ApiResult<Json<RecipeDetail>> {
    update(state, auth, id, payload, WriteMode::Replace).await
}

async fn update(
    state: AppState,
    auth: AuthContext,
    id: i64,
    payload: Result<Json<RecipePayload>, JsonRejection>,
    mode: WriteMode,
) -> ApiResult<Json<RecipeDetail>> {
    let Json(payload) = payload?;

    let recipe = recipes::update_recipe(&state.db, auth.user_id, id, payload, mode).await?;

    Ok(Json(recipe))
}

/// Deletes one of the requester's recipes
///
/// # Response
///
/// `204 No Content`. Tags and ingredients the recipe used are kept.
pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    recipes::delete_recipe(&state.db, auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
