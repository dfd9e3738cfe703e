pub mod health;
pub mod routines;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routines/preview", post(routines::preview_routine))
        .route("/routines/generate", post(routines::generate_routine))
        .route(
            "/routines",
            post(routines::save_preview).get(routines::list_routines),
        )
        .route(
            "/routines/{id}",
            get(routines::get_routine).delete(routines::delete_routine),
        )
        .route("/health", get(health::health_check))
        .with_state(state)
}
