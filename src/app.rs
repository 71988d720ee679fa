use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/days/:id/toggle", post(handlers::toggle_form))
        .route("/api/journey", get(handlers::get_journey))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/toggle", post(handlers::toggle))
        .route("/api/notes", put(handlers::put_note))
        .route(
            "/api/notifications/permission",
            get(handlers::get_permission).post(handlers::resolve_permission),
        )
        .route("/api/notifications", get(handlers::take_notifications))
        .route("/export/journal.pdf", get(handlers::export_journal))
        .route("/export/image/:region", get(handlers::export_image))
        .with_state(state)
}
