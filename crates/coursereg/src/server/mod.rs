use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::server::endpoints::{courses, status, student};
use crate::types::AppState;

mod endpoints;
mod types;

pub use endpoints::courses::FETCH_FAILED_MESSAGE;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(status::get_health))
        .route("/majors", get(student::get_majors))
        .route("/student", post(student::post_student))
        .route("/courses", get(courses::get_courses))
        .with_state(app_state)
}
