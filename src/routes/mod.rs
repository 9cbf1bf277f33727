pub mod actions;
pub mod assets;
pub mod page;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/posts/{*rest}", get(page::thread_page))
        .route("/assets/{*path}", get(assets::serve))
        .merge(actions::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
