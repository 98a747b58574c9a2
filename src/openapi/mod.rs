use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Floorspace API",
        version = "0.1.0",
        description = r#"
Backend API for building management: browse buildings, floor plans, rooms
and seats, search for rooms available in a time window, and book or cancel
rooms. Search, booking and cancellation run as background jobs; submit
returns a job id and `/tasks/result/{id}` is polled until the job is ready.

All task and workspace endpoints require the authenticated caller's user id
in the `x-user-id` header (stamped by the fronting gateway).
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::tasks::submit_search,
        handlers::tasks::submit_book,
        handlers::tasks::submit_cancel,
        handlers::tasks::job_result,
        handlers::tasks::activity,
        handlers::workspaces::create_building,
        handlers::workspaces::delete_building,
        handlers::workspaces::list_buildings,
        handlers::workspaces::create_floor_plan,
        handlers::workspaces::delete_floor_plan,
        handlers::workspaces::list_floor_plans,
        handlers::workspaces::create_room,
        handlers::workspaces::delete_room,
        handlers::workspaces::list_rooms,
        handlers::workspaces::create_seat,
        handlers::workspaces::delete_seat,
        handlers::workspaces::list_seats,
        handlers::users::register_user,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::jobs::JobStatus,
        crate::services::bookings::RoomAvailability,
        crate::services::bookings::BookingResponse,
        crate::services::bookings::BookingWindow,
        crate::services::workspaces::CreateBuildingRequest,
        crate::services::workspaces::CreateFloorPlanRequest,
        crate::services::workspaces::CreateRoomRequest,
        crate::services::workspaces::CreateSeatRequest,
        crate::services::users::RegisterUserRequest,
        crate::handlers::tasks::SearchForm,
        crate::handlers::tasks::BookForm,
    )),
    tags(
        (name = "tasks", description = "Asynchronous search/book/cancel jobs"),
        (name = "workspaces", description = "Buildings, floor plans, rooms and seats"),
        (name = "users", description = "Account registration")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
