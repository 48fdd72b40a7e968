/// Current-user endpoints
///
/// # Endpoints
///
/// - `GET /v1/users/me` - Profile of the authenticated user
/// - `PATCH /v1/users/me` - Change own name and/or password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use recipebox_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{UpdateUser, User},
    recipes::payload::{contains_nul, NUL_CHARACTER},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Profile update; only provided fields change
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMeRequest {
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub name: Option<String>,

    pub password: Option<String>,
}

/// Returns the authenticated user
///
/// A token whose user has since been deleted is treated as unauthenticated.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(user.into()))
}

/// Updates the authenticated user
///
/// # Endpoint
///
/// ```text
/// PATCH /v1/users/me
/// Authorization: Bearer <access token>
///
/// { "name": "New name", "password": "NewP@ssw0rd" }
/// ```
///
/// The password is re-hashed; it is never echoed back.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateMeRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Json(req) = payload?;

    req.validate().map_err(ApiError::from_validation)?;
    if req.name.as_deref().is_some_and(contains_nul) {
        return Err(ApiError::invalid_field("name", NUL_CHARACTER));
    }

    let password_hash = match req.password.as_deref() {
        Some(plain) => {
            password::validate_password_strength(plain)
                .map_err(|message| ApiError::invalid_field("password", message))?;
            Some(password::hash_password(plain)?)
        }
        None => None,
    };

    let update = UpdateUser {
        name: req.name.map(|name| name.trim().to_string()),
        password_hash,
    };

    let user = User::update(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");

    Ok(Json(user.into()))
}
