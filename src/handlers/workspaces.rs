use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};

use crate::{
    auth::AuthUser,
    entities::{building, floor_plan, room, seat},
    errors::ServiceError,
    services::workspaces::{
        CreateBuildingRequest, CreateFloorPlanRequest, CreateRoomRequest, CreateSeatRequest,
    },
    ApiResponse, AppState,
};

pub fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route("/buildings", get(list_buildings).post(create_building))
        .route("/buildings/:id", delete(delete_building))
        .route("/floors", get(list_floor_plans).post(create_floor_plan))
        .route("/floors/:id", delete(delete_floor_plan))
        .route("/rooms", get(list_rooms).post(create_room))
        .route("/rooms/:id", delete(delete_room))
        .route("/seats", get(list_seats).post(create_seat))
        .route("/seats/:id", delete(delete_seat))
}

/// Create a building.
#[utoipa::path(
    post,
    path = "/workspaces/buildings",
    request_body = CreateBuildingRequest,
    responses(
        (status = 201, description = "Building created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name or address already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn create_building(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateBuildingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.workspaces.create_building(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// Delete a building, cascading to its floors, rooms, seats and bookings.
#[utoipa::path(
    delete,
    path = "/workspaces/buildings/{id}",
    params(("id" = i32, Path, description = "Building id")),
    responses(
        (status = 200, description = "Building deleted"),
        (status = 404, description = "Unknown building id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn delete_building(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.workspaces.delete_building(id).await?;
    Ok(Json(ApiResponse::message("Building deleted")))
}

#[utoipa::path(
    get,
    path = "/workspaces/buildings",
    responses((status = 200, description = "All buildings")),
    tag = "workspaces"
)]
pub async fn list_buildings(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<building::Model>>>, ServiceError> {
    let buildings = state.services.workspaces.list_buildings().await?;
    Ok(Json(ApiResponse::success(buildings)))
}

/// Create a floor plan under an existing building.
#[utoipa::path(
    post,
    path = "/workspaces/floors",
    request_body = CreateFloorPlanRequest,
    responses(
        (status = 201, description = "Floor plan created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown building id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn create_floor_plan(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateFloorPlanRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.workspaces.create_floor_plan(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

#[utoipa::path(
    delete,
    path = "/workspaces/floors/{id}",
    params(("id" = i32, Path, description = "Floor plan id")),
    responses(
        (status = 200, description = "Floor plan deleted"),
        (status = 404, description = "Unknown floor plan id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn delete_floor_plan(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.workspaces.delete_floor_plan(id).await?;
    Ok(Json(ApiResponse::message("Floor plan deleted")))
}

#[utoipa::path(
    get,
    path = "/workspaces/floors",
    responses((status = 200, description = "All floor plans")),
    tag = "workspaces"
)]
pub async fn list_floor_plans(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<floor_plan::Model>>>, ServiceError> {
    let floors = state.services.workspaces.list_floor_plans().await?;
    Ok(Json(ApiResponse::success(floors)))
}

/// Create a room under an existing floor plan.
#[utoipa::path(
    post,
    path = "/workspaces/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown floor plan id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn create_room(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.workspaces.create_room(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

#[utoipa::path(
    delete,
    path = "/workspaces/rooms/{id}",
    params(("id" = i32, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room deleted"),
        (status = 404, description = "Unknown room id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn delete_room(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.workspaces.delete_room(id).await?;
    Ok(Json(ApiResponse::message("Room deleted")))
}

#[utoipa::path(
    get,
    path = "/workspaces/rooms",
    responses((status = 200, description = "All rooms")),
    tag = "workspaces"
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<room::Model>>>, ServiceError> {
    let rooms = state.services.workspaces.list_rooms().await?;
    Ok(Json(ApiResponse::success(rooms)))
}

/// Create a seat under an existing room.
#[utoipa::path(
    post,
    path = "/workspaces/seats",
    request_body = CreateSeatRequest,
    responses(
        (status = 201, description = "Seat created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown room id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn create_seat(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateSeatRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.workspaces.create_seat(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

#[utoipa::path(
    delete,
    path = "/workspaces/seats/{id}",
    params(("id" = i32, Path, description = "Seat id")),
    responses(
        (status = 200, description = "Seat deleted"),
        (status = 404, description = "Unknown seat id", body = crate::errors::ErrorResponse)
    ),
    tag = "workspaces"
)]
pub async fn delete_seat(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ServiceError> {
    state.services.workspaces.delete_seat(id).await?;
    Ok(Json(ApiResponse::message("Seat deleted")))
}

#[utoipa::path(
    get,
    path = "/workspaces/seats",
    responses((status = 200, description = "All seats")),
    tag = "workspaces"
)]
pub async fn list_seats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<ApiResponse<Vec<seat::Model>>>, ServiceError> {
    let seats = state.services.workspaces.list_seats().await?;
    Ok(Json(ApiResponse::success(seats)))
}
