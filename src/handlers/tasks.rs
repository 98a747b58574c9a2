use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    errors::ServiceError,
    jobs::{JobRequest, JobStatus},
    services::bookings::{parse_window, BookRoomRequest, BookingResponse},
    ApiResponse, AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(submit_search))
        .route("/book", post(submit_book))
        .route("/cancel/:id", post(submit_cancel))
        .route("/result/:id", get(job_result))
        .route("/activity", get(activity))
}

/// Form fields accepted by the availability search endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchForm {
    /// Start of the window, `HH:MM`
    pub start: String,
    /// End of the window, `HH:MM`
    pub end: String,
    /// Date of the window, `YYYY-MM-DD`
    pub date: String,
    /// Minimum headcount the room must hold
    pub count: i32,
}

/// Form fields accepted by the booking endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookForm {
    #[serde(default)]
    pub purpose: String,
    pub start: String,
    pub end: String,
    pub roomid: i32,
    pub date: String,
    pub count: i32,
}

/// Submit an availability search job.
///
/// Malformed date/time input is rejected here with 400 before anything is
/// enqueued; domain failures surface later through the job result.
#[utoipa::path(
    post,
    path = "/tasks/search",
    request_body(content = SearchForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Job accepted, body carries result_id"),
        (status = 400, description = "Malformed date/time or headcount", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "Job queue unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn submit_search(
    State(state): State<AppState>,
    _user: AuthUser,
    Form(form): Form<SearchForm>,
) -> Result<Json<Value>, ServiceError> {
    let window = parse_window(&form.date, &form.start, &form.end)?;
    let id = state.jobs.submit(JobRequest::Search {
        window,
        people: form.count,
    })?;
    Ok(Json(json!({ "result_id": id })))
}

/// Submit a booking admission job for the calling user.
#[utoipa::path(
    post,
    path = "/tasks/book",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Job accepted, body carries result_id"),
        (status = 400, description = "Malformed date/time or headcount", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "Job queue unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn submit_book(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<BookForm>,
) -> Result<Json<Value>, ServiceError> {
    let window = parse_window(&form.date, &form.start, &form.end)?;
    let id = state.jobs.submit(JobRequest::Book(BookRoomRequest {
        room_id: form.roomid,
        user_id: user.user_id,
        people_count: form.count,
        window,
        purpose: form.purpose,
    }))?;
    Ok(Json(json!({ "result_id": id })))
}

/// Submit a cancellation job for a booking id.
#[utoipa::path(
    post,
    path = "/tasks/cancel/{id}",
    params(("id" = i32, Path, description = "Booking id to cancel")),
    responses(
        (status = 200, description = "Job accepted, body carries result_id"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 500, description = "Job queue unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn submit_cancel(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ServiceError> {
    let job_id = state.jobs.submit(JobRequest::Cancel { booking_id: id })?;
    Ok(Json(json!({ "result_id": job_id })))
}

/// Poll a job result. `successful` and `value` remain null until `ready`;
/// a ready result is returned once and then discarded.
#[utoipa::path(
    get,
    path = "/tasks/result/{id}",
    params(("id" = Uuid, Path, description = "Job id returned at submit time")),
    responses(
        (status = 200, description = "Current job status", body = JobStatus),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown or already collected job id", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn job_result(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatus>, ServiceError> {
    let status = state
        .jobs
        .poll(id)
        .ok_or_else(|| ServiceError::NotFound(format!("Job with id {} not found", id)))?;
    Ok(Json(status))
}

/// List the calling user's bookings, open ones first.
#[utoipa::path(
    get,
    path = "/tasks/activity",
    responses(
        (status = 200, description = "Bookings of the calling user"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn activity(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, ServiceError> {
    let bookings = state
        .services
        .bookings
        .list_user_bookings(user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(bookings)))
}
