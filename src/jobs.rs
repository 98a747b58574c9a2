/*!
 * Background job dispatch for booking operations.
 *
 * Search, admission and cancellation never run inside an HTTP request:
 * handlers submit a job and immediately return its id, and callers poll
 * `/tasks/result/:id` until the job reports ready. The dispatcher is an
 * in-process worker fed by a bounded channel, with results kept in a
 * concurrent map keyed by job id until their first ready poll collects
 * them.
 */

use crate::errors::ServiceError;
use crate::services::bookings::{BookRoomRequest, BookingService, BookingWindow};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// One schedulable booking operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobRequest {
    Search { window: BookingWindow, people: i32 },
    Book(BookRoomRequest),
    Cancel { booking_id: i32 },
}

impl JobRequest {
    fn kind(&self) -> &'static str {
        match self {
            JobRequest::Search { .. } => "search",
            JobRequest::Book(_) => "book",
            JobRequest::Cancel { .. } => "cancel",
        }
    }
}

#[derive(Debug, Clone)]
struct Job {
    id: Uuid,
    request: JobRequest,
}

#[derive(Debug, Clone)]
enum JobState {
    Pending,
    Finished { successful: bool, value: Value },
}

/// Poll response for a submitted job. `successful` and `value` stay null
/// until `ready` is true.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobStatus {
    pub ready: bool,
    pub successful: Option<bool>,
    #[schema(value_type = Object)]
    pub value: Option<Value>,
}

/// Submit/poll facade handed to the HTTP layer.
#[derive(Clone)]
pub struct JobDispatcher {
    tx: mpsc::Sender<Job>,
    results: Arc<DashMap<Uuid, JobState>>,
}

/// Owns the receiving half of the job channel; drains it against a
/// `BookingService` until every dispatcher clone is dropped.
pub struct JobRunner {
    rx: mpsc::Receiver<Job>,
    results: Arc<DashMap<Uuid, JobState>>,
}

/// Creates a connected dispatcher/runner pair with a bounded queue.
pub fn channel(capacity: usize) -> (JobDispatcher, JobRunner) {
    let (tx, rx) = mpsc::channel(capacity);
    let results = Arc::new(DashMap::new());
    (
        JobDispatcher {
            tx,
            results: results.clone(),
        },
        JobRunner { rx, results },
    )
}

impl JobDispatcher {
    /// Enqueues a job and returns its id. Fails fast when the queue is full
    /// or the worker has stopped; the caller is never blocked.
    pub fn submit(&self, request: JobRequest) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        self.results.insert(id, JobState::Pending);

        let job = Job { id, request };
        info!(job_id = %id, kind = job.request.kind(), "Job submitted");

        if let Err(e) = self.tx.try_send(job) {
            self.results.remove(&id);
            warn!(job_id = %id, error = %e, "Failed to enqueue job");
            return Err(match e {
                mpsc::error::TrySendError::Full(_) => {
                    ServiceError::QueueError("Job queue is full".to_string())
                }
                mpsc::error::TrySendError::Closed(_) => {
                    ServiceError::QueueError("Job worker is not running".to_string())
                }
            });
        }

        Ok(id)
    }

    /// Returns the status of a previously submitted job, or `None` for an
    /// unknown id. A ready result is handed out once: polling it removes
    /// the entry, so the store holds only pending and not-yet-collected
    /// jobs. Subsequent polls of a collected id report `None`.
    pub fn poll(&self, id: Uuid) -> Option<JobStatus> {
        {
            let state = self.results.get(&id)?;
            if matches!(*state, JobState::Pending) {
                return Some(JobStatus {
                    ready: false,
                    successful: None,
                    value: None,
                });
            }
        }

        // The guard above is dropped before removal; the worker only ever
        // replaces Pending with Finished, so the entry is still finished
        // here.
        self.results.remove(&id).map(|(_, state)| match state {
            JobState::Pending => JobStatus {
                ready: false,
                successful: None,
                value: None,
            },
            JobState::Finished { successful, value } => JobStatus {
                ready: true,
                successful: Some(successful),
                value: Some(value),
            },
        })
    }
}

impl JobRunner {
    /// Worker loop. Each job runs to completion once picked up; its outcome
    /// (success payload or typed error) is stored for polling.
    pub async fn run(mut self, service: BookingService) {
        info!("Job worker started");

        while let Some(job) = self.rx.recv().await {
            let kind = job.request.kind();
            let state = match execute(&service, job.request).await {
                Ok(value) => {
                    info!(job_id = %job.id, kind, "Job finished");
                    JobState::Finished {
                        successful: true,
                        value,
                    }
                }
                Err(e) => {
                    error!(job_id = %job.id, kind, error = %e, "Job failed");
                    JobState::Finished {
                        successful: false,
                        value: json!({
                            "kind": e.kind(),
                            "message": e.response_message(),
                        }),
                    }
                }
            };
            self.results.insert(job.id, state);
        }

        info!("Job worker stopped");
    }
}

async fn execute(service: &BookingService, request: JobRequest) -> Result<Value, ServiceError> {
    match request {
        JobRequest::Search { window, people } => {
            let rooms = service.search_rooms(window, people).await?;
            serde_json::to_value(rooms)
                .map_err(|e| ServiceError::InternalError(format!("serialize search result: {e}")))
        }
        JobRequest::Book(request) => {
            let outcome = service.book_room(request).await?;
            serde_json::to_value(outcome)
                .map_err(|e| ServiceError::InternalError(format!("serialize booking: {e}")))
        }
        JobRequest::Cancel { booking_id } => {
            let cancelled = service.cancel_booking(booking_id).await?;
            serde_json::to_value(cancelled)
                .map_err(|e| ServiceError::InternalError(format!("serialize cancellation: {e}")))
        }
    }
}
