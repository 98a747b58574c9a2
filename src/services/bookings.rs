use crate::{
    db::DbPool,
    entities::booking::{self, BookingStatus, Entity as BookingEntity, Model as BookingModel},
    entities::room::{self, Entity as RoomEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

/// Half-open time interval `[start, end)` of a booking or a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BookingWindow {
    /// Standard half-open interval overlap: `[s1,e1)` and `[s2,e2)` overlap
    /// iff `s1 < e2 && s2 < e1`. Bookings that merely touch at a boundary
    /// do not conflict.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

/// Parses the wire encoding used by the task endpoints: `date` as
/// `YYYY-MM-DD` and times-of-day as `HH:MM`, combined into naive local
/// instants. No timezone is carried.
pub fn parse_window(date: &str, start: &str, end: &str) -> Result<BookingWindow, ServiceError> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::ValidationError(format!("Invalid date: {date:?}")))?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M")
        .map_err(|_| ServiceError::ValidationError(format!("Invalid start time: {start:?}")))?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M")
        .map_err(|_| ServiceError::ValidationError(format!("Invalid end time: {end:?}")))?;

    let window = BookingWindow {
        start: date.and_time(start),
        end: date.and_time(end),
    };

    if !window.is_well_formed() {
        return Err(ServiceError::ValidationError(
            "Booking window must start before it ends".to_string(),
        ));
    }

    Ok(window)
}

/// One row of an availability search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoomAvailability {
    pub room_id: i32,
    pub capacity: i32,
    pub floor_plan_id: i32,
    pub room_type: String,
    pub equipment: Option<String>,
}

/// Request to admit a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRoomRequest {
    pub room_id: i32,
    pub user_id: i32,
    pub people_count: i32,
    pub window: BookingWindow,
    pub purpose: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    pub room_id: i32,
    pub user_id: i32,
    pub people_count: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub purpose: String,
    pub status: String,
}

impl From<BookingModel> for BookingResponse {
    fn from(model: BookingModel) -> Self {
        Self {
            id: model.id,
            room_id: model.room_id,
            user_id: model.user_id,
            people_count: model.people_count,
            start_time: model.start_time,
            end_time: model.end_time,
            purpose: model.purpose,
            status: model.status,
        }
    }
}

/// Whether admission inserted a fresh row or revived an existing one.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "booking", rename_all = "snake_case")]
pub enum BookingOutcome {
    Created(BookingResponse),
    Reopened(BookingResponse),
}

impl BookingOutcome {
    pub fn booking(&self) -> &BookingResponse {
        match self {
            BookingOutcome::Created(b) | BookingOutcome::Reopened(b) => b,
        }
    }
}

/// Service for room availability search and booking admission/cancellation.
#[derive(Clone)]
pub struct BookingService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl BookingService {
    /// Creates a new booking service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Returns the rooms that hold at least `people` and have no open
    /// booking overlapping `window`, ordered by room id. Read-only.
    #[instrument(skip(self), fields(start = %window.start, end = %window.end, people))]
    pub async fn search_rooms(
        &self,
        window: BookingWindow,
        people: i32,
    ) -> Result<Vec<RoomAvailability>, ServiceError> {
        if people < 1 {
            return Err(ServiceError::ValidationError(
                "Headcount must be at least 1".to_string(),
            ));
        }
        if !window.is_well_formed() {
            return Err(ServiceError::ValidationError(
                "Booking window must start before it ends".to_string(),
            ));
        }

        let db = &*self.db_pool;

        // Rooms with an open booking overlapping the window are unavailable.
        let conflicting_rooms: Vec<i32> = BookingEntity::find()
            .select_only()
            .column(booking::Column::RoomId)
            .filter(booking::Column::Status.eq(BookingStatus::Open.as_str()))
            .filter(booking::Column::StartTime.lt(window.end))
            .filter(booking::Column::EndTime.gt(window.start))
            .into_tuple()
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query conflicting bookings");
                ServiceError::DatabaseError(e)
            })?;

        let mut query = RoomEntity::find().filter(room::Column::Capacity.gte(people));
        if !conflicting_rooms.is_empty() {
            query = query.filter(room::Column::Id.is_not_in(conflicting_rooms));
        }

        let rooms = query
            .order_by_asc(room::Column::Id)
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to query available rooms");
                ServiceError::DatabaseError(e)
            })?;

        let available: Vec<RoomAvailability> = rooms
            .into_iter()
            .map(|r| RoomAvailability {
                room_id: r.id,
                capacity: r.capacity,
                floor_plan_id: r.floor_plan_id,
                room_type: r.room_type,
                equipment: r.equipment,
            })
            .collect();

        info!(available = available.len(), "Availability search complete");

        Ok(available)
    }

    /// Attempts to persist a new open booking inside a single transaction.
    ///
    /// If a booking with the same (room, user, start, end) tuple already
    /// exists it is reopened and its headcount/purpose updated instead of
    /// inserting a duplicate. A window overlapping another tuple's open
    /// booking on the room is rejected with `Conflict` inside the same
    /// transaction, on both the insert and reopen paths, so a concurrent
    /// search-then-book sequence cannot double book a slot.
    #[instrument(skip(self, request), fields(room_id = request.room_id, user_id = request.user_id))]
    pub async fn book_room(
        &self,
        request: BookRoomRequest,
    ) -> Result<BookingOutcome, ServiceError> {
        if request.people_count < 1 {
            return Err(ServiceError::ValidationError(
                "people_count must be at least 1".to_string(),
            ));
        }
        if !request.window.is_well_formed() {
            return Err(ServiceError::ValidationError(
                "Booking window must start before it ends".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for booking admission");
            ServiceError::DatabaseError(e)
        })?;

        RoomEntity::find_by_id(request.room_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(room_id = request.room_id, "Room not found for booking");
                ServiceError::NotFound(format!("Room with id {} not found", request.room_id))
            })?;

        // Same-tuple pre-check replaces catching the uniqueness violation:
        // re-booking an identical slot reopens the existing row.
        let existing = BookingEntity::find()
            .filter(booking::Column::RoomId.eq(request.room_id))
            .filter(booking::Column::UserId.eq(request.user_id))
            .filter(booking::Column::StartTime.eq(request.window.start))
            .filter(booking::Column::EndTime.eq(request.window.end))
            .one(&txn)
            .await?;

        // Transactional overlap gate: the availability search is not atomic
        // with admission, so the window is re-checked here. It guards the
        // reopen path too, since another tuple may have taken the slot in
        // the meantime; the tuple's own row is excluded so re-submitting an
        // already-open booking stays a reopen.
        let mut conflict_query = BookingEntity::find()
            .filter(booking::Column::RoomId.eq(request.room_id))
            .filter(booking::Column::Status.eq(BookingStatus::Open.as_str()))
            .filter(booking::Column::StartTime.lt(request.window.end))
            .filter(booking::Column::EndTime.gt(request.window.start));
        if let Some(row) = &existing {
            conflict_query = conflict_query.filter(booking::Column::Id.ne(row.id));
        }

        if let Some(blocking) = conflict_query.one(&txn).await? {
            warn!(
                room_id = request.room_id,
                blocking_booking = blocking.id,
                "Booking window overlaps an open booking"
            );
            return Err(ServiceError::Conflict(format!(
                "Room {} already has an open booking overlapping the requested window",
                request.room_id
            )));
        }

        if let Some(row) = existing {
            let booking_id = row.id;
            let mut active: booking::ActiveModel = row.into();
            active.status = Set(BookingStatus::Open.as_str().to_string());
            active.people_count = Set(request.people_count);
            active.purpose = Set(request.purpose.clone());

            let updated = active.update(&txn).await?;
            txn.commit().await?;

            info!(booking_id, "Existing booking reopened");

            if let Some(event_sender) = &self.event_sender {
                if let Err(e) = event_sender
                    .send(Event::BookingReopened {
                        booking_id,
                        room_id: request.room_id,
                        user_id: request.user_id,
                    })
                    .await
                {
                    warn!(error = %e, booking_id, "Failed to send booking reopened event");
                }
            }

            return Ok(BookingOutcome::Reopened(updated.into()));
        }

        let active = booking::ActiveModel {
            room_id: Set(request.room_id),
            user_id: Set(request.user_id),
            people_count: Set(request.people_count),
            start_time: Set(request.window.start),
            end_time: Set(request.window.end),
            purpose: Set(request.purpose.clone()),
            status: Set(BookingStatus::Open.as_str().to_string()),
            ..Default::default()
        };

        let created = active.insert(&txn).await.map_err(|e| {
            error!(error = %e, room_id = request.room_id, "Failed to insert booking");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await?;

        info!(booking_id = created.id, "Booking created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::BookingCreated {
                    booking_id: created.id,
                    room_id: created.room_id,
                    user_id: created.user_id,
                })
                .await
            {
                warn!(error = %e, booking_id = created.id, "Failed to send booking created event");
            }
        }

        Ok(BookingOutcome::Created(created.into()))
    }

    /// Marks a booking closed. Cancelling an already-closed booking is a
    /// no-op; a missing id is a `NotFound` error rather than a silent skip.
    #[instrument(skip(self), fields(booking_id))]
    pub async fn cancel_booking(&self, booking_id: i32) -> Result<BookingResponse, ServiceError> {
        let db = &*self.db_pool;
        let txn = db.begin().await?;

        let row = BookingEntity::find_by_id(booking_id)
            .one(&txn)
            .await?
            .ok_or_else(|| {
                warn!(booking_id, "Booking not found for cancellation");
                ServiceError::NotFound(format!("Booking with id {} not found", booking_id))
            })?;

        if row.status == BookingStatus::Closed.as_str() {
            info!(booking_id, "Booking already closed");
            return Ok(row.into());
        }

        let mut active: booking::ActiveModel = row.into();
        active.status = Set(BookingStatus::Closed.as_str().to_string());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!(booking_id, "Booking cancelled");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::BookingCancelled(booking_id)).await {
                warn!(error = %e, booking_id, "Failed to send booking cancelled event");
            }
        }

        Ok(updated.into())
    }

    /// Lists the bookings of one user: open bookings first (most recent at
    /// the top), then closed ones.
    #[instrument(skip(self), fields(user_id))]
    pub async fn list_user_bookings(
        &self,
        user_id: i32,
    ) -> Result<Vec<BookingResponse>, ServiceError> {
        let db = &*self.db_pool;

        let open = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::Status.eq(BookingStatus::Open.as_str()))
            .order_by_desc(booking::Column::Id)
            .all(db)
            .await?;

        let closed = BookingEntity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .filter(booking::Column::Status.eq(BookingStatus::Closed.as_str()))
            .order_by_asc(booking::Column::Id)
            .all(db)
            .await?;

        Ok(open
            .into_iter()
            .chain(closed)
            .map(BookingResponse::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: (u32, u32), end: (u32, u32)) -> BookingWindow {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        BookingWindow {
            start: date.and_time(NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap()),
            end: date.and_time(NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap()),
        }
    }

    #[test]
    fn contained_interval_overlaps() {
        assert!(window((9, 0), (10, 0)).overlaps(&window((9, 30), (9, 45))));
    }

    #[test]
    fn partial_overlap_detected_both_directions() {
        let a = window((9, 0), (10, 0));
        let b = window((9, 30), (10, 30));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        // Half-open windows: one ending exactly when the other starts is fine.
        assert!(!window((9, 0), (10, 0)).overlaps(&window((10, 0), (11, 0))));
        assert!(!window((10, 0), (11, 0)).overlaps(&window((9, 0), (10, 0))));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!window((9, 0), (10, 0)).overlaps(&window((11, 0), (12, 0))));
    }

    #[test]
    fn parse_window_accepts_wire_format() {
        let w = parse_window("2024-06-01", "09:30", "09:45").unwrap();
        assert_eq!(w, window((9, 30), (9, 45)));
    }

    #[test]
    fn parse_window_rejects_malformed_input() {
        assert!(matches!(
            parse_window("June 1st", "09:00", "10:00"),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            parse_window("2024-06-01", "9am", "10:00"),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            parse_window("2024-06-01", "09:00", "banana"),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn parse_window_rejects_inverted_window() {
        assert!(matches!(
            parse_window("2024-06-01", "10:00", "09:00"),
            Err(ServiceError::ValidationError(_))
        ));
        assert!(matches!(
            parse_window("2024-06-01", "10:00", "10:00"),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
