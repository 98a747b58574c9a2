//! Floorspace API Library
//!
//! Backend for a building-management system: buildings, floor plans, rooms
//! and seats, with room-availability search and booking executed as
//! background jobs polled over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod jobs;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub jobs: jobs::JobDispatcher,
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Full API surface: task submission/polling, workspace administration and
/// account registration, plus a trivial liveness route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "floorspace-api up" }))
        .nest("/tasks", handlers::tasks::task_routes())
        .nest("/workspaces", handlers::workspaces::workspace_routes())
        .nest("/users", handlers::users::user_routes())
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.data.as_deref(), Some(&[1, 2, 3][..]));
        assert!(response.message.is_none());
        assert!(!response.timestamp.is_empty());
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
