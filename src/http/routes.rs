use super::handlers;
use super::state::AppState;
use crate::upload::MAX_UPLOAD_BODY;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.storage.public_dir.clone();

    // Everything touching the file store sits behind the session gate.
    let protected = Router::new()
        .route(
            "/api/upload",
            post(handlers::upload_recordings).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY)),
        )
        .route("/api/recordings", get(handlers::list_recordings))
        .route(
            "/api/recordings/:filename",
            delete(handlers::delete_recording),
        )
        .route("/uploads/:filename", get(handlers::fetch_recording))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_auth,
        ));

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session management
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/check-auth", get(handlers::check_auth))
        .merge(protected)
        // Static frontend assets, unauthenticated
        .fallback_service(ServeDir::new(public_dir))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
