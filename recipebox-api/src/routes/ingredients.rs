/// Ingredient endpoints
///
/// # Endpoints
///
/// - `GET /v1/ingredients` - List own ingredients, name descending
/// - `PATCH /v1/ingredients/:id` - Rename
/// - `DELETE /v1/ingredients/:id` - Delete (204)

use super::named::{self, RenameRequest};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use recipebox_shared::{auth::middleware::AuthContext, models::ingredient::Ingredient};

pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Ingredient>>> {
    named::list::<Ingredient>(&state, auth).await
}

pub async fn rename_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> ApiResult<Json<Ingredient>> {
    named::rename::<Ingredient>(&state, auth, id, payload).await
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    named::delete::<Ingredient>(&state, auth, id).await
}
