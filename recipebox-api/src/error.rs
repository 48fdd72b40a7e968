/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers should return `Result<T, ApiError>` which automatically
/// converts to appropriate HTTP status codes.
///
/// # Example
///
/// ```
/// use recipebox_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Recipe not found".to_string()))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipebox_shared::{
    auth::{jwt::JwtError, middleware::AuthError, password::PasswordError},
    models::user::UserInputError,
    recipes::{reconcile::ReconcileError, FieldError, RecipeError},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. a body that isn't valid JSON
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404), also used for rows owned by someone else
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation, e.g. `tags[1].name`
    pub field: String,

    /// Error message
    pub message: String,
}

impl ValidationErrorDetail {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<FieldError> for ValidationErrorDetail {
    fn from(err: FieldError) -> Self {
        Self {
            field: err.field,
            message: err.message,
        }
    }
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Validation failure on a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail::new(field, message)])
    }

    /// Maps `validator` derive errors, one detail per failed rule
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Suffix of the Postgres-generated `user_id` foreign keys on owned tables
const OWNER_FK_SUFFIX: &str = "_user_id_fkey";

/// Prefix axum puts in front of serde errors for well-formed but mistyped bodies
const JSON_DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some(constraint) if constraint.contains("email") => {
                        ApiError::Conflict("A user with that email already exists".to_string())
                    }
                    Some(constraint) if constraint.contains("name") => {
                        ApiError::Conflict("An entry with that name already exists".to_string())
                    }
                    Some(constraint) => {
                        ApiError::Conflict(format!("Constraint violation: {}", constraint))
                    }
                    None => ApiError::Conflict("Duplicate entry".to_string()),
                }
            }
            // The token outlived its user; rows can no longer be owned by them
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation()
                    && db_err
                        .constraint()
                        .is_some_and(|constraint| constraint.ends_with(OWNER_FK_SUFFIX)) =>
            {
                ApiError::Unauthorized("User no longer exists".to_string())
            }
            sqlx::Error::Database(db_err) => {
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        match err {
            RecipeError::Validation(errors) => {
                ApiError::ValidationError(errors.into_iter().map(Into::into).collect())
            }
            RecipeError::NotFound => ApiError::NotFound("Recipe not found".to_string()),
            RecipeError::Database(err) => err.into(),
            RecipeError::Reconcile(ReconcileError::Database(err)) => err.into(),
            RecipeError::Reconcile(err) => ApiError::InternalError(err.to_string()),
        }
    }
}

/// Malformed bodies are 400; well-formed JSON with a mistyped field is a
/// field-level validation error
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let (field, message) = split_data_error(&err.body_text());
                ApiError::invalid_field(field, message)
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Splits axum's data error text into the serde field path and the message
///
/// Errors at the document root (wrong top-level type, missing required
/// field) have no path and are reported under `non_field_errors`.
fn split_data_error(text: &str) -> (String, String) {
    let detail = text.strip_prefix(JSON_DATA_ERROR_PREFIX).unwrap_or(text);

    match detail.split_once(": ") {
        Some((path, message)) if is_field_path(path) => (path.to_string(), message.to_string()),
        _ => ("non_field_errors".to_string(), detail.to_string()),
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<UserInputError> for ApiError {
    fn from(err: UserInputError) -> Self {
        ApiError::invalid_field("email", err.to_string())
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebox_shared::recipes::RecipePayload;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Recipe not found".to_string());
        assert_eq!(err.to_string(), "Not found: Recipe not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail::new("title", "This field is required."),
            ValidationErrorDetail::new("tags[1].name", "This field is required."),
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_recipe_error_mapping() {
        let err: ApiError = RecipeError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError =
            RecipeError::Validation(vec![FieldError::new("tags[0].name", "This field is required.")])
                .into();
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details, vec![ValidationErrorDetail::new("tags[0].name", "This field is required.")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err: ApiError = RecipeError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_reconcile_failure_is_internal() {
        let err: ApiError = RecipeError::Reconcile(ReconcileError::Vanished {
            kind: "tag",
            name: "Vegan".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError =
            RecipeError::Reconcile(ReconcileError::Database(sqlx::Error::PoolTimedOut)).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn rejection(body: &str) -> ApiError {
        match Json::<RecipePayload>::from_bytes(body.as_bytes()) {
            Ok(_) => panic!("body should be rejected: {}", body),
            Err(rejection) => rejection.into(),
        }
    }

    fn single_field(err: ApiError) -> String {
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                details[0].field.clone()
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_mistyped_fields_are_field_errors() {
        assert_eq!(single_field(rejection(r#"{"time_minutes": "thirty"}"#)), "time_minutes");
        assert_eq!(single_field(rejection(r#"{"price": "abc"}"#)), "price");
        assert_eq!(
            single_field(rejection(r#"{"tags": [{"name": "Vegan"}, {"name": 5}]}"#)),
            "tags[1].name"
        );
        assert_eq!(single_field(rejection(r#""not an object""#)), "non_field_errors");
    }

    #[test]
    fn test_malformed_json_stays_bad_request() {
        assert!(matches!(rejection(r#"{"title": "#), ApiError::BadRequest(_)));
    }

    #[test]
    fn test_split_data_error() {
        assert_eq!(
            split_data_error(
                "Failed to deserialize the JSON body into the target type: tags[0].name: invalid type: integer `5`, expected a string at line 1 column 22"
            ),
            (
                "tags[0].name".to_string(),
                "invalid type: integer `5`, expected a string at line 1 column 22".to_string()
            )
        );
        assert_eq!(
            split_data_error("invalid type: sequence, expected struct RecipePayload").0,
            "non_field_errors"
        );
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let err: ApiError = AuthError::MissingCredentials.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: ApiError = JwtError::Expired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_validation_response_body() {
        let response = ApiError::invalid_field("price", "This field is required.").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "price");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::InternalError("connection reset".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body.get("details").is_none());
    }
}
