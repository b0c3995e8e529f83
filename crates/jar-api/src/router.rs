use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::require_session;
use crate::state::AppState;
use crate::{auth, export, memories, mood, pages};

/// The full HTTP surface. Static assets are served from `static_dir` under `/static`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let public_routes = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/faq", get(pages::faq))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/", get(memories::index))
        .route("/past", get(memories::past))
        .route("/new", get(memories::new_page).post(memories::new_memory))
        .route("/logout", get(auth::logout))
        .route("/history", get(memories::history))
        .route("/mood-data", get(mood::mood_data))
        .route("/mood", get(mood::mood_page))
        .route("/export", get(export::export))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(pages::not_found_handler)
        // Nothing user-specific may be cached by the browser or a proxy.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
}
