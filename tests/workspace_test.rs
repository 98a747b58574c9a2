mod common;

use common::TestApp;
use floorspace_api::entities::{booking, floor_plan, room, seat};
use floorspace_api::errors::ServiceError;
use floorspace_api::services::bookings::{parse_window, BookRoomRequest};
use floorspace_api::services::workspaces::{
    CreateBuildingRequest, CreateFloorPlanRequest, CreateRoomRequest, CreateSeatRequest,
};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn deleting_building_cascades_to_everything_below() {
    let app = TestApp::new().await;
    let user = app.seed_user("ops@example.com").await;

    let building = app.seed_building("HQ").await;
    let floor = app.seed_floor_plan(building).await;
    let room_id = app.seed_room(floor, "Boardroom", 12).await;
    app.seed_seat(room_id, "A1").await;
    app.seed_seat(room_id, "A2").await;

    app.state
        .services
        .bookings
        .book_room(BookRoomRequest {
            room_id,
            user_id: user,
            people_count: 4,
            window: parse_window("2024-06-01", "09:00", "10:00").unwrap(),
            purpose: "planning".to_string(),
        })
        .await
        .unwrap();

    app.state
        .services
        .workspaces
        .delete_building(building)
        .await
        .unwrap();

    let db = &*app.state.db;
    assert_eq!(floor_plan::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(room::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(seat::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(booking::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_room_cascades_to_seats_and_bookings_only() {
    let app = TestApp::new().await;
    let user = app.seed_user("ops@example.com").await;

    let building = app.seed_building("Annex").await;
    let floor = app.seed_floor_plan(building).await;
    let room_id = app.seed_room(floor, "Huddle", 4).await;
    app.seed_seat(room_id, "B1").await;

    app.state
        .services
        .bookings
        .book_room(BookRoomRequest {
            room_id,
            user_id: user,
            people_count: 2,
            window: parse_window("2024-06-02", "14:00", "15:00").unwrap(),
            purpose: "1:1".to_string(),
        })
        .await
        .unwrap();

    app.state
        .services
        .workspaces
        .delete_room(room_id)
        .await
        .unwrap();

    let db = &*app.state.db;
    assert_eq!(seat::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(booking::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(floor_plan::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_building_name_or_address_is_rejected() {
    let app = TestApp::new().await;
    app.state
        .services
        .workspaces
        .create_building(CreateBuildingRequest {
            name: "HQ".to_string(),
            address: "1 Main St".to_string(),
        })
        .await
        .unwrap();

    let same_name = app
        .state
        .services
        .workspaces
        .create_building(CreateBuildingRequest {
            name: "HQ".to_string(),
            address: "2 Side St".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(same_name, ServiceError::Conflict(_)));

    let same_address = app
        .state
        .services
        .workspaces
        .create_building(CreateBuildingRequest {
            name: "Annex".to_string(),
            address: "1 Main St".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(same_address, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn creating_under_missing_parent_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .workspaces
        .create_floor_plan(CreateFloorPlanRequest {
            building_id: 404,
            name: "Phantom".to_string(),
            level: 1,
            image_file: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = app
        .state
        .services
        .workspaces
        .create_room(CreateRoomRequest {
            floor_plan_id: 404,
            name: "Phantom".to_string(),
            room_type: "meeting".to_string(),
            capacity: 4,
            equipment: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = app
        .state
        .services
        .workspaces
        .create_seat(CreateSeatRequest {
            room_id: 404,
            label: "Z9".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn deleting_missing_entities_is_not_found() {
    let app = TestApp::new().await;
    let svc = &app.state.services.workspaces;

    assert!(matches!(
        svc.delete_building(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.delete_floor_plan(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.delete_room(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.delete_seat(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn listings_return_created_rows() {
    let app = TestApp::new().await;
    let building = app.seed_building("Campus").await;
    let floor = app.seed_floor_plan(building).await;
    let room_id = app.seed_room(floor, "Lab", 6).await;
    app.seed_seat(room_id, "C1").await;

    let svc = &app.state.services.workspaces;
    assert_eq!(svc.list_buildings().await.unwrap().len(), 1);
    assert_eq!(svc.list_floor_plans().await.unwrap().len(), 1);
    assert_eq!(svc.list_rooms().await.unwrap().len(), 1);
    assert_eq!(svc.list_seats().await.unwrap().len(), 1);
}
