/// Handlers shared by the tag and ingredient endpoints
///
/// Both resources are per-user name lists with the same operations; the
/// route modules pick the entity type.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use recipebox_shared::{
    auth::middleware::AuthContext,
    models::named::{self, NamedEntity},
    recipes::payload::{contains_nul, MAX_NAME_LENGTH, NUL_CHARACTER},
};
use serde::Deserialize;

/// Rename request
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: Option<String>,
}

impl RenameRequest {
    /// Returns the trimmed new name
    fn validated_name(self) -> ApiResult<String> {
        let name = self
            .name
            .map(|name| name.trim().to_string())
            .ok_or_else(|| ApiError::invalid_field("name", "This field is required."))?;

        if name.is_empty() {
            return Err(ApiError::invalid_field("name", "This field may not be blank."));
        }
        if contains_nul(&name) {
            return Err(ApiError::invalid_field("name", NUL_CHARACTER));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ApiError::invalid_field(
                "name",
                "Ensure this field has no more than 255 characters.",
            ));
        }

        Ok(name)
    }
}

fn not_found<T: NamedEntity>() -> ApiError {
    ApiError::NotFound(format!("No {} matches the given query", T::KIND))
}

pub(crate) async fn list<T: NamedEntity>(state: &AppState, auth: AuthContext) -> ApiResult<Json<Vec<T>>> {
    let entities = named::list_for_owner::<T>(&state.db, auth.user_id).await?;
    Ok(Json(entities))
}

pub(crate) async fn rename<T: NamedEntity>(
    state: &AppState,
    auth: AuthContext,
    id: i64,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> ApiResult<Json<T>> {
    let Json(req) = payload?;
    let name = req.validated_name()?;

    let entity = named::rename_owned::<T>(&state.db, id, auth.user_id, &name)
        .await?
        .ok_or_else(not_found::<T>)?;

    tracing::info!(kind = T::KIND, id = id, user_id = %auth.user_id, "Renamed");

    Ok(Json(entity))
}

pub(crate) async fn delete<T: NamedEntity>(
    state: &AppState,
    auth: AuthContext,
    id: i64,
) -> ApiResult<StatusCode> {
    if !named::delete_owned::<T>(&state.db, id, auth.user_id).await? {
        return Err(not_found::<T>());
    }

    tracing::info!(kind = T::KIND, id = id, user_id = %auth.user_id, "Deleted");

    Ok(StatusCode::NO_CONTENT)
}
