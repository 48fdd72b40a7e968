/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use recipebox_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = recipebox_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use recipebox_shared::auth::middleware::authenticate;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/
///     ├── /auth/                    # Public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /users/me                 # GET, PATCH
///     ├── /recipes                  # GET, POST
///     │   └── /:id                  # GET, PATCH, PUT, DELETE
///     ├── /tags                     # GET
///     │   └── /:id                  # PATCH, DELETE
///     └── /ingredients              # GET
///         └── /:id                  # PATCH, DELETE
/// ```
///
/// Everything under `/v1` except `/v1/auth` requires a bearer access token.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything owned by the requester
    let protected_routes = Router::new()
        .route(
            "/users/me",
            get(routes::users::get_me).patch(routes::users::update_me),
        )
        .route(
            "/recipes",
            get(routes::recipes::list_recipes).post(routes::recipes::create_recipe),
        )
        .route(
            "/recipes/:id",
            get(routes::recipes::get_recipe)
                .patch(routes::recipes::patch_recipe)
                .put(routes::recipes::put_recipe)
                .delete(routes::recipes::delete_recipe),
        )
        .route("/tags", get(routes::tags::list_tags))
        .route(
            "/tags/:id",
            patch(routes::tags::rename_tag).delete(routes::tags::delete_tag),
        )
        .route("/ingredients", get(routes::ingredients::list_ingredients))
        .route(
            "/ingredients/:id",
            patch(routes::ingredients::rename_ingredient)
                .delete(routes::ingredients::delete_ingredient),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Rejects requests without a valid access token and injects the
/// requester's `AuthContext`
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret()).map_err(|err| {
        tracing::debug!(error = %err, path = %req.uri().path(), "Rejected unauthenticated request");
        ApiError::from(err)
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};
    use axum::{body::Body, http::StatusCode};
    use recipebox_shared::db::pool::{create_lazy_pool, DatabaseConfig as PoolConfig};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let url = "postgresql://localhost/recipebox_unused".to_string();
        let pool = create_lazy_pool(&PoolConfig {
            url: url.clone(),
            min_connections: 0,
            ..Default::default()
        })
        .unwrap();

        AppState::new(
            pool,
            Config {
                api: ApiConfig {
                    host: "127.0.0.1".to_string(),
                    port: 0,
                    cors_origins: vec!["*".to_string()],
                    production: false,
                },
                database: DatabaseConfig {
                    url,
                    max_connections: 1,
                    run_migrations: false,
                },
                jwt: JwtConfig {
                    secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                },
            },
        )
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for (method, uri) in [
            ("GET", "/v1/recipes"),
            ("POST", "/v1/recipes"),
            ("GET", "/v1/recipes/1"),
            ("DELETE", "/v1/recipes/1"),
            ("GET", "/v1/tags"),
            ("GET", "/v1/ingredients"),
            ("GET", "/v1/users/me"),
        ] {
            let response = build_router(test_state())
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let response = build_router(test_state())
            .oneshot(
                Request::builder()
                    .uri("/v1/recipes")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::X_CONTENT_TYPE_OPTIONS).is_some());
    }
}
