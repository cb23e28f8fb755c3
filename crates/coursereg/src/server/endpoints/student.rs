//! Student form endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tracing::{info, warn};

use crate::form::{majors_by_school, StudentForm};
use crate::server::types::ApiErrorType;

/// GET /majors
///
/// Returns the selectable majors grouped by school.
pub async fn get_majors() -> Response {
    (StatusCode::OK, Json(majors_by_school())).into_response()
}

/// POST /student
///
/// Validates a submitted year and major and redirects to the course listing
/// for that student.
pub async fn post_student(Json(form): Json<StudentForm>) -> Response {
    info!("POST /student (year={}, major={})", form.year, form.major);

    match form.resolve() {
        Ok(criteria) => {
            Redirect::to(&format!("/courses?{}", criteria.to_query_string())).into_response()
        }
        Err(e) => {
            warn!("Rejected student form: {}", e);
            ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid student form",
                Some(e.to_string()),
            ))
            .into_response()
        }
    }
}
