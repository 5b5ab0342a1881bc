pub mod health;
pub mod legacy;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/session", post(handlers::handle_start_session))
        .route("/session/:id/answers", post(handlers::handle_submit_answers))
        .route("/session/:id/result", get(handlers::handle_fetch_result))
        // Aliases used by the bundled pages
        .route("/api/student-info", post(legacy::handle_student_info))
        .route("/api/questions", post(legacy::handle_questions))
        .route("/api/results/:student_id", get(legacy::handle_results))
        .fallback_service(static_files)
        .with_state(state)
}
