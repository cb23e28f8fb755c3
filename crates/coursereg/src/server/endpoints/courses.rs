//! Course listing endpoint.
//!
//! Fetches the term's courses for the requesting student, reduces each to
//! the tier that applies to them, then applies the listing's title filter,
//! sort and selection.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::catalog::CatalogError;
use crate::priority::{Course, PriorityBadge, StudentCriteria};
use crate::server::types::ApiErrorType;
use crate::table::{CourseTable, SortSpec};
use crate::types::AppState;

/// Message shown to the student when the catalogue can't be read.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch courses from database";

/// Query parameters for `GET /courses`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CourseQueryParams {
    pub year: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// `priority`, `-priority`, `abbr` or `-abbr`
    pub sort: Option<String>,
    /// Comma-separated course ids
    pub selected: Option<String>,
    /// Selects every row passing the title filter
    #[serde(default)]
    pub select_all: bool,
}

/// A listed course plus the badge for its tier, if it has one.
#[derive(Debug, Serialize)]
struct CourseRow<'a> {
    #[serde(flatten)]
    course: &'a Course,
    badge: Option<PriorityBadge>,
}

impl<'a> From<&'a Course> for CourseRow<'a> {
    fn from(course: &'a Course) -> Self {
        Self {
            course,
            badge: course.priorities.first().map(PriorityBadge::from),
        }
    }
}

fn fetch_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": FETCH_FAILED_MESSAGE })),
    )
        .into_response()
}

/// GET /courses
///
/// Query parameters:
/// - `year`, `school`, `major` (optional): the student; missing or empty means unspecified
/// - `title` (optional): title filter
/// - `sort` (optional): sort column, `-` prefix for descending
/// - `selected` (optional): ids of selected rows
/// - `select_all` (optional): `true` to select every filtered row
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(params): Query<CourseQueryParams>,
) -> Response {
    info!(
        "GET /courses (year={:?}, school={:?}, major={:?})",
        params.year, params.school, params.major
    );

    let sort = match params
        .sort
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(str::parse::<SortSpec>)
        .transpose()
    {
        Ok(sort) => sort,
        Err(e) => {
            warn!("Rejected course listing request: {}", e);
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Invalid sort parameter",
                Some(e.to_string()),
            ))
            .into_response();
        }
    };

    let criteria = StudentCriteria::from_params(
        params.year.as_deref(),
        params.school.as_deref(),
        params.major.as_deref(),
    );
    if criteria.is_empty() {
        info!("No student criteria given, listing every course");
    }

    let state = s.clone();
    let courses = match tokio::task::spawn_blocking(move || {
        state.catalog.fetch_ranked_courses(&state.term, &criteria)
    })
    .await
    .map_err(CatalogError::from)
    .and_then(|fetched| fetched)
    {
        Ok(courses) => courses,
        Err(e) => {
            error!("Database connection error: {}", e);
            return fetch_failure();
        }
    };

    let mut table = CourseTable::new(courses);
    table.set_title_filter(params.title.as_deref());
    table.set_sort(sort);
    for id in params
        .selected
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        table.select(id);
    }
    if params.select_all {
        table.set_all_selected(true);
    }

    let rows: Vec<CourseRow> = table
        .visible_rows()
        .into_iter()
        .map(CourseRow::from)
        .collect();
    let selected: Vec<&str> = table
        .selected_rows()
        .into_iter()
        .map(|c| c.abbr.as_str())
        .collect();

    info!(
        "Listing {} of {} courses for {}",
        rows.len(),
        table.len(),
        s.term
    );

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "count": table.len(),
            "filtered_count": rows.len(),
            "data": rows,
            "selected_count": selected.len(),
            "selected": selected,
            "selection_summary": table.selection_summary(),
        })),
    )
        .into_response()
}
