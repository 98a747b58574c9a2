mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

#[tokio::test]
async fn requests_without_user_header_are_rejected() {
    let app = TestApp::new().await;

    let req = Request::builder()
        .method(Method::GET)
        .uri("/tasks/activity")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/tasks/search")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-user-id", "not-a-number")
        .body(Body::from("start=09:00&end=10:00&date=2024-06-01&count=2"))
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn search_job_round_trip_returns_matching_rooms() {
    let app = TestApp::new().await;
    let user = app.seed_user("alice@example.com").await;
    app.seed_room_chain("Closet", 2).await;
    let big = app.seed_room_chain("Hall", 20).await;

    let (status, body) = app
        .post_form(
            user,
            "/tasks/search",
            "start=09:00&end=10:00&date=2024-06-01&count=8",
        )
        .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    let result_id = body["result_id"].as_str().unwrap().to_string();

    let result = app.await_job(user, &result_id).await;
    assert_eq!(result["successful"], json!(true));
    let rooms = result["value"].as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room_id"], json!(big));
    assert_eq!(rooms[0]["capacity"], json!(20));
}

#[tokio::test]
async fn book_cancel_rebook_flow_over_http() {
    let app = TestApp::new().await;
    let user = app.seed_user("bob@example.com").await;
    let room = app.seed_room_chain("Atrium", 10).await;

    // First admission creates the booking.
    let (status, body) = app
        .post_form(
            user,
            "/tasks/book",
            &format!("start=09:00&end=10:00&date=2024-06-01&roomid={room}&count=4&purpose=standup"),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    let result = app
        .await_job(user, body["result_id"].as_str().unwrap())
        .await;
    assert_eq!(result["successful"], json!(true));
    assert_eq!(result["value"]["outcome"], json!("created"));
    let booking_id = result["value"]["booking"]["id"].as_i64().unwrap();

    // Cancel it.
    let (status, body) = app
        .post_form(user, &format!("/tasks/cancel/{booking_id}"), "")
        .await;
    assert_eq!(status, StatusCode::OK);
    let result = app
        .await_job(user, body["result_id"].as_str().unwrap())
        .await;
    assert_eq!(result["successful"], json!(true));
    assert_eq!(result["value"]["status"], json!("closed"));

    // The same tuple books again by reopening the existing row.
    let (status, body) = app
        .post_form(
            user,
            "/tasks/book",
            &format!("start=09:00&end=10:00&date=2024-06-01&roomid={room}&count=6&purpose=retro"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let result = app
        .await_job(user, body["result_id"].as_str().unwrap())
        .await;
    assert_eq!(result["successful"], json!(true));
    assert_eq!(result["value"]["outcome"], json!("reopened"));
    assert_eq!(result["value"]["booking"]["id"], json!(booking_id));
    assert_eq!(result["value"]["booking"]["people_count"], json!(6));
}

#[tokio::test]
async fn conflicting_booking_surfaces_through_job_result() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice@example.com").await;
    let bob = app.seed_user("bob@example.com").await;
    let room = app.seed_room_chain("Forum", 10).await;

    let (_, body) = app
        .post_form(
            alice,
            "/tasks/book",
            &format!("start=09:00&end=10:00&date=2024-06-01&roomid={room}&count=3"),
        )
        .await;
    let result = app
        .await_job(alice, body["result_id"].as_str().unwrap())
        .await;
    assert_eq!(result["successful"], json!(true));

    let (status, body) = app
        .post_form(
            bob,
            "/tasks/book",
            &format!("start=09:30&end=10:30&date=2024-06-01&roomid={room}&count=3"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let result = app
        .await_job(bob, body["result_id"].as_str().unwrap())
        .await;
    assert_eq!(result["successful"], json!(false));
    assert_eq!(result["value"]["kind"], json!("conflict"));
}

#[tokio::test]
async fn malformed_window_is_rejected_before_enqueue() {
    let app = TestApp::new().await;
    let user = app.seed_user("carol@example.com").await;

    let (status, body) = app
        .post_form(
            user,
            "/tasks/search",
            "start=25:99&end=10:00&date=2024-06-01&count=2",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Bad Request"));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Invalid start time"));

    let (status, _) = app
        .post_form(
            user,
            "/tasks/search",
            "start=09:00&end=10:00&date=June+1st&count=2",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn polling_unknown_job_is_not_found() {
    let app = TestApp::new().await;
    let user = app.seed_user("dave@example.com").await;

    let (status, body) = app
        .get(user, &format!("/tasks/result/{}", Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("Not Found"));
}

#[tokio::test]
async fn activity_lists_only_the_calling_users_bookings() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice@example.com").await;
    let bob = app.seed_user("bob@example.com").await;
    let room = app.seed_room_chain("Gallery", 10).await;

    let (_, body) = app
        .post_form(
            alice,
            "/tasks/book",
            &format!("start=09:00&end=10:00&date=2024-06-01&roomid={room}&count=2"),
        )
        .await;
    app.await_job(alice, body["result_id"].as_str().unwrap())
        .await;

    let (status, body) = app.get(alice, "/tasks/activity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get(bob, "/tasks/activity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn workspace_endpoints_round_trip_over_http() {
    let app = TestApp::new().await;
    let user = app.seed_user("ops@example.com").await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/workspaces/buildings")
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(
            json!({"name": "HQ", "address": "1 Main St"}).to_string(),
        ))
        .unwrap();
    let (status, body) = app.request(req).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let building_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app.get(user, "/workspaces/buildings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/workspaces/buildings/{building_id}"))
        .header("x-user-id", user.to_string())
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.request(req).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(user, "/workspaces/buildings").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn registering_duplicate_email_conflicts() {
    let app = TestApp::new().await;

    let payload = json!({
        "email": "new@example.com",
        "role": "staff",
        "password": "hunter2hunter2",
        "first_name": "Nadia"
    })
    .to_string();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(payload.clone()))
        .unwrap();
    let (status, body) = app.request(req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"].get("password").is_none());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(payload))
        .unwrap();
    let (status, body) = app.request(req).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("Conflict"));
}
