use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use super::common::*;
use crate::moderation::router::{actions_handler, status_handler, StatusChangeRequest};
use crate::moderation::status::PropertyStatus;
use crate::moderation::ModerationService;

#[tokio::test]
async fn actions_handler_lists_visible_buttons() {
    let (service, _, _) = build_service();

    let response = actions_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Ok(Path("prop-approved".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    let labels: Vec<&str> = payload["data"]["actions"]
        .as_array()
        .expect("actions array")
        .iter()
        .filter_map(|button| button["label"].as_str())
        .collect();
    assert_eq!(labels, vec!["Tolak", "Publikasikan"]);
    assert_eq!(payload["data"]["badge"]["label"], json!("Disetujui"));
    assert_eq!(payload["data"]["listingId"], json!("prop-approved"));
    assert_eq!(
        payload["data"]["actions"][0]["targetStatus"],
        json!("rejected")
    );
}

#[tokio::test]
async fn status_handler_returns_conflict_for_illegal_move() {
    let (service, repository, _) = build_service();

    let response = status_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Ok(Path("prop-published-missing".to_string())),
        Ok(axum::Json(StatusChangeRequest {
            status: "approved".to_string(),
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (service, _, _) = build_service();
    let response = status_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Ok(Path("prop-unpublished".to_string())),
        Ok(axum::Json(StatusChangeRequest {
            status: "approved".to_string(),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["code"], json!("illegal_transition"));
    assert_eq!(
        repository.status_of("prop-unpublished"),
        Some(PropertyStatus::Unpublished)
    );
}

#[tokio::test]
async fn status_handler_rejects_unknown_status() {
    let (service, _, _) = build_service();

    let response = status_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Ok(Path("prop-pending".to_string())),
        Ok(axum::Json(StatusChangeRequest {
            status: "archived".to_string(),
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("invalid_status"));
}

#[tokio::test]
async fn action_route_publishes_approved_listing() {
    let (service, repository, notifier) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/admin/properties/prop-approved/actions/publish")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["status"], json!("published"));
    assert_eq!(
        repository.status_of("prop-approved"),
        Some(PropertyStatus::Published)
    );
    assert_eq!(notifier.events().len(), 1);
}

#[tokio::test]
async fn list_route_applies_query_filters() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/admin/properties?status=pending&type=all&page=1&pageSize=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let items = payload["data"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], json!("prop-pending"));
    assert_eq!(items[0]["propertyType"], json!("house"));
    assert_eq!(items[0]["agentId"], json!("agent-1"));
    assert!(items[0]["createdAt"].is_string());
    assert!(items[0].get("property_type").is_none());
    assert_eq!(payload["pagination"]["total"], json!(1));
    assert_eq!(payload["pagination"]["pageSize"], json!(5));
    assert_eq!(payload["pagination"]["hasPrev"], json!(false));
}

#[tokio::test]
async fn list_route_rejects_unknown_filter_option() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/admin/properties?purpose=auction")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("invalid_filter"));
}

#[tokio::test]
async fn edit_and_delete_routes() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::patch("/api/v1/admin/properties/prop-pending")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "city": "Sleman" }).to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["city"], json!("Sleman"));

    let response = router
        .oneshot(
            Request::delete("/api/v1/admin/properties/prop-pending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(repository.status_of("prop-pending").is_none());
}

#[tokio::test]
async fn stats_route_returns_cards() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(Request::get("/api/v1/admin/stats").body(Body::empty()).unwrap())
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["data"]["stats"]["total"], json!(5));
    assert_eq!(payload["data"]["cards"][0]["key"], json!("total"));
}

#[tokio::test]
async fn repository_outage_maps_to_internal_error() {
    let service = ModerationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        catalog(),
    );

    let response = actions_handler::<UnavailableRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Ok(Path("prop-pending".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("repository_unavailable"));
}

#[tokio::test]
async fn malformed_query_gets_failure_envelope() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/admin/properties?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["code"], json!("invalid_request"));
    assert!(payload["error"].as_str().is_some_and(|error| !error.is_empty()));
}

#[tokio::test]
async fn malformed_body_gets_failure_envelope() {
    let (service, repository, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/admin/properties/prop-pending/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"status\": "))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["code"], json!("invalid_request"));
    assert_eq!(
        repository.status_of("prop-pending"),
        Some(PropertyStatus::Pending)
    );
}
