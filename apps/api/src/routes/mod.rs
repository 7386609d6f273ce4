pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::reports::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/reports/rejections",
            post(handlers::handle_rejection_report),
        )
        .route(
            "/api/v1/reports/contests/:id/funnel",
            get(handlers::handle_funnel_report),
        )
        .route(
            "/api/v1/reports/contests/:id/activity",
            get(handlers::handle_activity_report),
        )
        .with_state(state)
}
