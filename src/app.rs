use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/:exercise/state", get(handlers::get_state))
        .route("/api/:exercise/add", post(handlers::add_entry))
        .route("/api/:exercise/edit/:id", post(handlers::begin_edit))
        .route("/api/:exercise/cancel", post(handlers::cancel_edit))
        .route("/api/:exercise/save", post(handlers::save_entry))
        .route("/api/:exercise/delete/:id", post(handlers::delete_entry))
        .route("/api/:exercise/clear", post(handlers::clear_entries))
        .with_state(state)
}
