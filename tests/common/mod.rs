#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use floorspace_api::{
    api_routes,
    auth::USER_ID_HEADER,
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    jobs,
    services::users::RegisterUserRequest,
    services::workspaces::{
        CreateBuildingRequest, CreateFloorPlanRequest, CreateRoomRequest, CreateSeatRequest,
    },
    AppState,
};

/// Helper harness spinning up an application state backed by an in-memory
/// SQLite database, with the event loop and job worker running.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _job_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single pooled connection keeps every query on the same
        // in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let (dispatcher, runner) = jobs::channel(64);
        let job_task = tokio::spawn(runner.run((*services.bookings).clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
            jobs: dispatcher,
        };

        let router = api_routes().with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _job_task: job_task,
        }
    }

    /// Sends a request through the router and decodes the JSON body.
    pub async fn request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("request should not fail at the transport level");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// POST a form-encoded body as the given user.
    pub async fn post_form(&self, user_id: i32, path: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/x-www-form-urlencoded")
            .header(USER_ID_HEADER, user_id.to_string())
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.request(req).await
    }

    /// GET a path as the given user.
    pub async fn get(&self, user_id: i32, path: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header(USER_ID_HEADER, user_id.to_string())
            .body(Body::empty())
            .expect("valid request");
        self.request(req).await
    }

    /// Polls `/tasks/result/{id}` until the job reports ready.
    pub async fn await_job(&self, user_id: i32, result_id: &str) -> Value {
        for _ in 0..200 {
            let (status, body) = self
                .get(user_id, &format!("/tasks/result/{result_id}"))
                .await;
            assert_eq!(status, StatusCode::OK, "poll failed: {body}");
            if body["ready"] == Value::Bool(true) {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {result_id} did not finish in time");
    }

    // Seed helpers go through the service layer so tests exercise the same
    // code paths as production callers.

    pub async fn seed_user(&self, email: &str) -> i32 {
        self.state
            .services
            .users
            .register_user(RegisterUserRequest {
                email: email.to_string(),
                role: "staff".to_string(),
                password: "hunter2hunter2".to_string(),
                first_name: "Test".to_string(),
            })
            .await
            .expect("failed to seed user")
            .id
    }

    pub async fn seed_building(&self, name: &str) -> i32 {
        self.state
            .services
            .workspaces
            .create_building(CreateBuildingRequest {
                name: name.to_string(),
                address: format!("{name} street 1"),
            })
            .await
            .expect("failed to seed building")
            .id
    }

    pub async fn seed_floor_plan(&self, building_id: i32) -> i32 {
        self.state
            .services
            .workspaces
            .create_floor_plan(CreateFloorPlanRequest {
                building_id,
                name: "Ground floor".to_string(),
                level: 0,
                image_file: None,
            })
            .await
            .expect("failed to seed floor plan")
            .id
    }

    pub async fn seed_room(&self, floor_plan_id: i32, name: &str, capacity: i32) -> i32 {
        self.state
            .services
            .workspaces
            .create_room(CreateRoomRequest {
                floor_plan_id,
                name: name.to_string(),
                room_type: "meeting".to_string(),
                capacity,
                equipment: Some("whiteboard".to_string()),
            })
            .await
            .expect("failed to seed room")
            .id
    }

    pub async fn seed_seat(&self, room_id: i32, label: &str) -> i32 {
        self.state
            .services
            .workspaces
            .create_seat(CreateSeatRequest {
                room_id,
                label: label.to_string(),
            })
            .await
            .expect("failed to seed seat")
            .id
    }

    /// Shorthand: building -> floor plan -> room, returning the room id.
    pub async fn seed_room_chain(&self, name: &str, capacity: i32) -> i32 {
        let building = self.seed_building(name).await;
        let floor = self.seed_floor_plan(building).await;
        self.seed_room(floor, name, capacity).await
    }
}
