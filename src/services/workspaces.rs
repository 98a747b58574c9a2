use crate::{
    db::DbPool,
    entities::building::{self, Entity as BuildingEntity, Model as BuildingModel},
    entities::floor_plan::{self, Entity as FloorPlanEntity, Model as FloorPlanModel},
    entities::room::{self, Entity as RoomEntity, Model as RoomModel},
    entities::seat::{self, Entity as SeatEntity, Model as SeatModel},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBuildingRequest {
    #[validate(length(min = 1, message = "Building name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Building address is required"))]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateFloorPlanRequest {
    pub building_id: i32,
    #[validate(length(min = 1, message = "Floor plan name is required"))]
    pub name: String,
    pub level: i32,
    pub image_file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    pub floor_plan_id: i32,
    #[validate(length(min = 1, message = "Room name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Room type is required"))]
    pub room_type: String,
    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    pub capacity: i32,
    pub equipment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSeatRequest {
    pub room_id: i32,
    #[validate(length(min = 1, message = "Seat label is required"))]
    pub label: String,
}

/// Administrative create/delete/list operations for buildings, floor plans,
/// rooms and seats. Deletes cascade through the schema's foreign keys:
/// building -> floor plans -> rooms -> seats and bookings.
#[derive(Clone)]
pub struct WorkspaceService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl WorkspaceService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send workspace event");
            }
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_building(
        &self,
        request: CreateBuildingRequest,
    ) -> Result<BuildingModel, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        // Both name and address carry unique constraints; a friendlier
        // Conflict beats surfacing the raw database error.
        let duplicate = BuildingEntity::find()
            .filter(
                building::Column::Name
                    .eq(request.name.clone())
                    .or(building::Column::Address.eq(request.address.clone())),
            )
            .one(db)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A building named {:?} or at {:?} already exists",
                request.name, request.address
            )));
        }

        let created = building::ActiveModel {
            name: Set(request.name),
            address: Set(request.address),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(building_id = created.id, "Building created");
        self.emit(Event::BuildingCreated(created.id)).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_building(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let building = BuildingEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Building with id {} not found", id)))?;

        building.delete(db).await?;

        info!(building_id = id, "Building deleted (cascading to floors, rooms, seats, bookings)");
        self.emit(Event::BuildingDeleted(id)).await;

        Ok(())
    }

    pub async fn list_buildings(&self) -> Result<Vec<BuildingModel>, ServiceError> {
        Ok(BuildingEntity::find()
            .order_by_asc(building::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, request), fields(building_id = request.building_id))]
    pub async fn create_floor_plan(
        &self,
        request: CreateFloorPlanRequest,
    ) -> Result<FloorPlanModel, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        BuildingEntity::find_by_id(request.building_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Building with id {} not found",
                    request.building_id
                ))
            })?;

        let created = floor_plan::ActiveModel {
            building_id: Set(request.building_id),
            name: Set(request.name),
            level: Set(request.level),
            image_file: Set(request.image_file),
            created_at: Set(Utc::now().naive_utc()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(floor_plan_id = created.id, "Floor plan created");
        self.emit(Event::FloorPlanCreated(created.id)).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_floor_plan(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let floor = FloorPlanEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Floor plan with id {} not found", id)))?;

        floor.delete(db).await?;

        info!(floor_plan_id = id, "Floor plan deleted");
        self.emit(Event::FloorPlanDeleted(id)).await;

        Ok(())
    }

    pub async fn list_floor_plans(&self) -> Result<Vec<FloorPlanModel>, ServiceError> {
        Ok(FloorPlanEntity::find()
            .order_by_asc(floor_plan::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, request), fields(floor_plan_id = request.floor_plan_id))]
    pub async fn create_room(&self, request: CreateRoomRequest) -> Result<RoomModel, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        FloorPlanEntity::find_by_id(request.floor_plan_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Floor plan with id {} not found",
                    request.floor_plan_id
                ))
            })?;

        let created = room::ActiveModel {
            floor_plan_id: Set(request.floor_plan_id),
            name: Set(request.name),
            room_type: Set(request.room_type),
            capacity: Set(request.capacity),
            equipment: Set(request.equipment),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(room_id = created.id, "Room created");
        self.emit(Event::RoomCreated(created.id)).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_room(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let room = RoomEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Room with id {} not found", id)))?;

        room.delete(db).await?;

        info!(room_id = id, "Room deleted");
        self.emit(Event::RoomDeleted(id)).await;

        Ok(())
    }

    pub async fn list_rooms(&self) -> Result<Vec<RoomModel>, ServiceError> {
        Ok(RoomEntity::find()
            .order_by_asc(room::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self, request), fields(room_id = request.room_id))]
    pub async fn create_seat(&self, request: CreateSeatRequest) -> Result<SeatModel, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        RoomEntity::find_by_id(request.room_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Room with id {} not found", request.room_id))
            })?;

        let created = seat::ActiveModel {
            room_id: Set(request.room_id),
            label: Set(request.label),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(seat_id = created.id, "Seat created");
        self.emit(Event::SeatCreated(created.id)).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn delete_seat(&self, id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let seat = SeatEntity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seat with id {} not found", id)))?;

        seat.delete(db).await?;

        info!(seat_id = id, "Seat deleted");
        self.emit(Event::SeatDeleted(id)).await;

        Ok(())
    }

    pub async fn list_seats(&self) -> Result<Vec<SeatModel>, ServiceError> {
        Ok(SeatEntity::find()
            .order_by_asc(seat::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }
}
