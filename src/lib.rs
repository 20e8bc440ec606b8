pub mod assets;
pub mod error;
pub mod handlers;
pub mod models;
pub mod storage;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, post},
    Router,
};
use time::UtcOffset;

use store::SharedStore;

/// How long a marked-for-removal item waits for the surface's
/// animation-end signal before the removal is finalized anyway.
pub const REMOVAL_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub base_path: Arc<String>,
    pub offset: UtcOffset,
    pub removal_grace: Duration,
}

/// Local offset when the platform can determine it, UTC otherwise. Due
/// days are displayed and the overdue boundary evaluated in this offset.
pub fn display_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.base_path.clone();

    let app_routes = Router::new()
        .route("/", get(handlers::web::index))
        .route("/static/{*path}", get(handlers::web::static_file))
        .route("/api/todos", get(handlers::api::list_todos))
        .route("/api/todos", post(handlers::api::create_todo))
        .route("/api/todos/{id}/toggle", post(handlers::api::toggle_todo))
        .route("/api/todos/{id}", delete(handlers::api::remove_todo))
        .route("/api/todos/{id}/removed", post(handlers::api::removal_done))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&*base_path, app_routes)
    }
}
