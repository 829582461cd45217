// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, health, progress},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, progress, health).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (service handles + config).
/// * Optionally serves the static HTML pages as a fallback.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/guest", post(auth::guest))
        // Protected: the middleware resolves the token to a live user.
        .merge(
            Router::new()
                .route("/verify", get(auth::verify))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let progress_routes = Router::new()
        .route("/modules/titles", get(progress::module_titles))
        .merge(
            Router::new()
                .route("/", get(progress::get_overview))
                .route("/{module_id}", post(progress::update_module))
                .route("/{module_id}/assessment", post(progress::submit_assessment))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let static_dir = state.config.static_dir.clone();

    let router = Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/progress", progress_routes)
        .route("/api/health", get(health::health_check))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    // Static pages are a fallback collaborator; API routes always win.
    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}
