/// Tag endpoints
///
/// Tags are created through recipe payloads; these routes list, rename and
/// delete the requester's own tags. Deleting a tag unlinks it from every
/// recipe but leaves the recipes alone.
///
/// # Endpoints
///
/// - `GET /v1/tags` - List own tags, name descending
/// - `PATCH /v1/tags/:id` - Rename (`{"name": "..."}`)
/// - `DELETE /v1/tags/:id` - Delete (204)

use super::named::{self, RenameRequest};
use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use recipebox_shared::{auth::middleware::AuthContext, models::tag::Tag};

pub async fn list_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tag>>> {
    named::list::<Tag>(&state, auth).await
}

/// Renames a tag; `409 Conflict` if the requester already has that name
pub async fn rename_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> ApiResult<Json<Tag>> {
    named::rename::<Tag>(&state, auth, id, payload).await
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    named::delete::<Tag>(&state, auth, id).await
}
