/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use tasklist_api::{app::{build_router, AppState}, config::Config};
/// use tasklist_shared::store::Store;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Store::memory(), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tasklist_shared::{
    auth::middleware::jwt_auth_middleware,
    services::{task_service::TaskService, user_service::UserService},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is an `Arc` or wraps one.
#[derive(Clone)]
pub struct AppState {
    /// Repository handles
    pub store: Store,

    /// User use cases
    pub users: UserService,

    /// Task use cases
    pub tasks: TaskService,

    /// Application configuration
    pub config: Arc<Config>,

    /// JWT signing secret, shared with the auth middleware
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Creates new application state over a store
    pub fn new(store: Store, config: Config) -> Self {
        Self {
            users: UserService::new(store.users.clone()),
            tasks: TaskService::new(store.users.clone(), store.tasks.clone()),
            jwt_secret: Arc::from(config.jwt.secret.as_str()),
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /                              (public)
/// ├── GET    /health                        (public)
/// ├── POST   /users                         (public)
/// ├── POST   /users/find-or-create          (public)
/// ├── POST   /users/authenticate            (public)
/// ├── GET    /users/find?email=             (bearer)
/// ├── GET    /tasks/user                    (bearer)
/// ├── GET    /tasks/user/:user_id           (bearer, own ID only)
/// ├── POST   /tasks                         (bearer)
/// ├── GET    /tasks/:id                     (bearer)
/// ├── PUT    /tasks/:id                     (bearer)
/// ├── PATCH  /tasks/:id/toggle-completion   (bearer)
/// └── DELETE /tasks/:id                     (bearer)
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then bearer
/// authentication on the protected routes only.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/users", post(routes::users::create_user))
        .route("/users/find-or-create", post(routes::users::find_or_create_user))
        .route("/users/authenticate", post(routes::users::authenticate));

    let protected_routes = Router::new()
        .route("/users/find", get(routes::users::find_user))
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks/user", get(routes::tasks::list_user_tasks))
        .route("/tasks/user/:user_id", get(routes::tasks::list_tasks_by_user_id))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/tasks/:id/toggle-completion",
            patch(routes::tasks::toggle_completion),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt_secret.clone(),
            jwt_auth_middleware,
        ));

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
            .max_age(Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
