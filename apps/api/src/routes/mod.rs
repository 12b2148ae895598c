pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::screening::handlers as screening;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", delete(session::handle_end_session))
        .route(
            "/api/v1/sessions/:id/resumes",
            get(session::handle_list_resumes),
        )
        // Screening
        .route(
            "/api/v1/sessions/:id/screenings",
            post(screening::handle_screen_resume),
        )
        .route(
            "/api/v1/sessions/:id/screenings/batch",
            post(screening::handle_screen_batch),
        )
        .with_state(state)
}
