//! Route table and shared state for the projects resource.

use axum::Router;
use axum::routing::get;
use storekit_db::Store;
use tower_http::trace::TraceLayer;

use super::handlers;

/// State shared by every handler: the process-wide store handle. Each
/// request gets its own unit of work off it.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Build the module router. Every success is a plain 200; failure status
/// comes from the error translation table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
