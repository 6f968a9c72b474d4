use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::api_key::require_api_key;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes.
///
/// Every route except the health check sits behind the API-key layer.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Users
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        // Contents
        .route("/contents", post(handlers::create_content))
        .route("/contents/filter", get(handlers::filter_contents))
        .route("/contents/:id", delete(handlers::delete_content))
        .route(
            "/contents/:id/popularity",
            post(handlers::recompute_popularity),
        )
        // Interactions
        .route("/interactions", post(handlers::create_interaction))
        // Recommendations
        .route(
            "/recommendations/:user_id",
            get(handlers::get_recommendations),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // request-id runs outermost so the trace span can read it
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
