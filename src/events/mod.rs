use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Domain events emitted after successful state changes. Consumers hang off
/// the processing loop; failures to deliver never fail the originating
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Booking lifecycle
    BookingCreated {
        booking_id: i32,
        room_id: i32,
        user_id: i32,
    },
    BookingReopened {
        booking_id: i32,
        room_id: i32,
        user_id: i32,
    },
    BookingCancelled(i32),

    // Workspace administration
    BuildingCreated(i32),
    BuildingDeleted(i32),
    FloorPlanCreated(i32),
    FloorPlanDeleted(i32),
    RoomCreated(i32),
    RoomDeleted(i32),
    SeatCreated(i32),
    SeatDeleted(i32),

    // Accounts
    UserRegistered(i32),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel and logs each event with structured fields.
/// Runs until every sender is dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BookingCreated {
                booking_id,
                room_id,
                user_id,
            } => {
                info!(booking_id, room_id, user_id, "booking created");
            }
            Event::BookingReopened {
                booking_id,
                room_id,
                user_id,
            } => {
                info!(booking_id, room_id, user_id, "booking reopened");
            }
            Event::BookingCancelled(booking_id) => {
                info!(booking_id, "booking cancelled");
            }
            other => {
                debug!(event = ?other, "workspace event");
            }
        }
    }

    info!("Event processing loop stopped");
}
