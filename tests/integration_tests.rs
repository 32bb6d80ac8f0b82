// Integration tests for Shelter Finder

use actix_web::{http::StatusCode, test, App};
use serde_json::json;
use shelter_finder::config::RankingSettings;
use shelter_finder::core::{DaytimeHours, ShelterRanker};
use shelter_finder::models::{AvailabilityTier, EmergencyResponse, PageResponse, RankResponse, ShelterView, SnapshotResponse};
use shelter_finder::routes::{app_config, AppState};
use shelter_finder::services::ShelterCatalog;
use std::sync::Arc;

const SEED_PATH: &str = "data/shelters.json";

fn create_state(daytime_hours: DaytimeHours) -> AppState {
    let catalog = ShelterCatalog::load_seed(SEED_PATH).expect("seed file should load");
    AppState {
        catalog: Arc::new(catalog),
        ranker: ShelterRanker::new(daytime_hours),
        ranking: RankingSettings::default(),
    }
}

fn ids(views: &[ShelterView]) -> Vec<&str> {
    views.iter().map(|v| v.id.as_str()).collect()
}

#[actix_web::test]
async fn test_health_reports_catalog_size() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["shelters"], 6);
}

#[actix_web::test]
async fn test_nearby_orders_by_distance() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=12")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body.results), vec!["1", "6", "4", "3", "2", "5"]);
    assert_eq!(body.count, 6);
    assert_eq!(body.hour, 12);
    assert_eq!(body.results[0].distance_label.as_deref(), Some("0 m"));

    // Zero-bed shelters stay in the list with tier none
    let riverside = &body.results[1];
    assert_eq!(riverside.availability, AvailabilityTier::None);
}

#[actix_web::test]
async fn test_nearby_open_now_filter() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=12&filters=open_now")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body.results), vec!["1", "6", "3", "5"]);
    assert!(body.results.iter().all(|v| v.is_open));

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=20&filters=open_now,family")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body.results), vec!["2"]);
}

#[actix_web::test]
async fn test_nearby_strict_daytime_hours() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::Strict)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=20&filters=open_now")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;

    // The 9 AM - 5 PM day center is closed in the evening
    assert!(!ids(&body.results).contains(&"6"));
}

#[actix_web::test]
async fn test_nearby_limit_and_radius() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=12&limit=2")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body.results), vec!["1", "6"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&hour=12&radiusKm=1")
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ids(&body.results), vec!["1", "6", "4"]);
}

#[actix_web::test]
async fn test_nearby_rejects_invalid_coordinates() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lat=95&lng=-74.006")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/nearby?lng=-74.006")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_non_finite_coordinates_rejected() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    for uri in [
        "/api/v1/emergency/nearest?lat=NaN&lng=0&hour=12",
        "/api/v1/shelters/nearby?lat=40.7128&lng=inf",
        "/api/v1/shelters/nearby?lat=40.7128&lng=-74.006&radiusKm=NaN",
        "/api/v1/shelters/1?lat=NaN&lng=-74.006",
        "/api/v1/shelters/snapshot?lat=0&lng=NaN",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[actix_web::test]
async fn test_rank_caller_supplied_shelters() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/shelters/rank")
        .set_json(json!({
            "latitude": 0.0,
            "longitude": 0.0,
            "hour": 3,
            "filters": ["pet_friendly", "serves_breakfast"],
            "shelters": [
                { "id": "far", "latitude": 0.0, "longitude": 0.05, "capacity": 10, "available_beds": 5, "pet_friendly": true },
                { "id": "near", "latitude": 0.0, "longitude": 0.01, "capacity": 10, "available_beds": 1, "pet_friendly": true },
                { "id": "no-pets", "latitude": 0.0, "longitude": 0.0, "capacity": 10, "available_beds": 5 },
                { "id": "broken", "latitude": 0.0, "longitude": 0.0, "capacity": 1, "available_beds": 5 }
            ]
        }))
        .to_request();
    let body: RankResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(ids(&body.results), vec!["near", "far"]);
    assert_eq!(body.results[0].availability, AvailabilityTier::Low);
    assert_eq!(body.results[1].availability, AvailabilityTier::High);
    assert_eq!(body.rejected.len(), 1);
    assert_eq!(body.rejected[0].id.as_deref(), Some("broken"));
}

#[actix_web::test]
async fn test_rank_malformed_json() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/shelters/rank")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_shelter_detail() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/2?lat=40.7128&lng=-74.006&hour=10")
        .to_request();
    let view: ShelterView = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view.name, "Sunrise Family Center");
    assert_eq!(view.hours, "18:00 - 08:00");
    assert!(!view.is_open);
    assert!((view.distance_km.unwrap() - 1.99).abs() < 0.01);

    let req = test::TestRequest::get().uri("/api/v1/shelters/3").to_request();
    let view: ShelterView = test::call_and_read_body_json(&app, req).await;
    assert!(view.distance_km.is_none());

    let req = test::TestRequest::get().uri("/api/v1/shelters/404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_paginated_listing() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get().uri("/api/v1/shelters?page=2&limit=4").to_request();
    let body: PageResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total, 6);
    assert_eq!(ids(&body.results), vec!["5", "6"]);
    assert!(!body.has_next);

    let req = test::TestRequest::get().uri("/api/v1/shelters?limit=4").to_request();
    let body: PageResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.page, 1);
    assert!(body.has_next);

    // Listing honours the caller's hour like the other endpoints
    let req = test::TestRequest::get().uri("/api/v1/shelters?limit=4&hour=12").to_request();
    let body: PageResponse = test::call_and_read_body_json(&app, req).await;
    let open: Vec<bool> = body.results.iter().map(|v| v.is_open).collect();
    assert_eq!(open, vec![true, false, true, false]);

    let req = test::TestRequest::get().uri("/api/v1/shelters?limit=4&hour=22").to_request();
    let body: PageResponse = test::call_and_read_body_json(&app, req).await;
    assert!(body.results.iter().all(|v| v.is_open));
}

#[actix_web::test]
async fn test_offline_snapshot() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/shelters/snapshot?lat=40.7352&lng=-74.0186")
        .to_request();
    let body: SnapshotResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.count, 6);
    assert_eq!(body.results[0].id, "5");

    let req = test::TestRequest::get().uri("/api/v1/shelters/snapshot").to_request();
    let body: SnapshotResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.results[0].id, "1");
    assert!(body.results.iter().all(|v| v.distance_km.is_none()));
}

#[actix_web::test]
async fn test_emergency_nearest() {
    let app = test::init_service(App::new().configure(app_config(create_state(DaytimeHours::AssumeOpen)))).await;

    // Midday: the men's mission next door is closed, fall back to the 24h shelter
    let req = test::TestRequest::get()
        .uri("/api/v1/emergency/nearest?lat=40.7074&lng=-74.0113&hour=12")
        .to_request();
    let body: EmergencyResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.shelter.map(|s| s.id), Some("1".to_string()));

    let req = test::TestRequest::get()
        .uri("/api/v1/emergency/nearest?lat=40.7074&lng=-74.0113&hour=22")
        .to_request();
    let body: EmergencyResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.shelter.map(|s| s.id), Some("4".to_string()));
}
