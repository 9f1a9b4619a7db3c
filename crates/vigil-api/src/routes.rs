use crate::handlers::{add_model, ping, remove_model, run_monitor, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/run-monitor", get(run_monitor))
        .route("/add-model", post(add_model))
        .route("/remove-model", delete(remove_model))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
