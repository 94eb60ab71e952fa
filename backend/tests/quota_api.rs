use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use partner_quotas::quota::{AgencyTier, DeveloperTier, SubscriptionPlan};
use partner_quotas::store::{InMemoryResourceStore, Partner, Resource, ResourceCollection};
use partner_quotas::QuotaService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// key: quota-api-tests -> limits,usage,gating,marketplace

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn property(partner_id: Uuid, title: &str) -> Resource {
    Resource {
        id: Uuid::new_v4(),
        partner_id,
        collection: ResourceCollection::Properties,
        title: title.to_string(),
        listing_start_date: None,
        listing_end_date: None,
        created_at: Utc::now(),
    }
}

fn app_with(partners: Vec<Partner>, resources: Vec<Resource>) -> Router {
    let store = InMemoryResourceStore::with_fixtures(partners, resources);
    partner_quotas::app(QuotaService::new(Arc::new(store)))
}

#[tokio::test]
async fn plan_limits_endpoint_reports_every_kind() {
    let app = app_with(Vec::new(), Vec::new());

    let (status, body) = send(&app, Method::GET, "/api/plans/agency/commission/limits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"], json!({ "category": "agency", "tier": "commission" }));
    let limits = body["limits"].as_array().unwrap();
    assert_eq!(limits.len(), 4);
    assert_eq!(limits[0], json!({ "kind": "properties", "limit": 0 }));
    assert_eq!(limits[1], json!({ "kind": "projects", "limit": null }));

    let (status, _) = send(&app, Method::GET, "/api/plans/developer/paid_listing/limits", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/plans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn agency_basic_is_blocked_at_three_and_released_after_removal() {
    let agency = Partner {
        id: Uuid::new_v4(),
        name: "Corner Realty".into(),
        plan: Some(SubscriptionPlan::Agency(AgencyTier::Basic)),
    };
    let owned: Vec<Resource> = (1..=3)
        .map(|n| property(agency.id, &format!("Flat {n}")))
        .collect();
    let first_id = owned[0].id;
    let mut resources = owned;
    resources.push(property(Uuid::new_v4(), "Someone else's house"));
    let app = app_with(vec![agency.clone()], resources);

    let usage_uri = format!("/api/partners/{}/usage/properties", agency.id);
    let (status, body) = send(&app, Method::GET, &usage_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["limit"], 3);
    assert_eq!(body["is_limit_reached"], true);
    assert_eq!(body["remaining"], 0);
    assert_eq!(body["gate"], "upgrade_required");

    let create_uri = format!("/api/partners/{}/resources/properties", agency.id);
    let (status, body) = send(
        &app,
        Method::POST,
        &create_uri,
        Some(json!({ "title": "Flat 4" })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error"], "quota_exceeded");
    assert_eq!(body["gate"], "upgrade_required");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/resources/{first_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, &usage_uri, None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["is_limit_reached"], false);
    assert_eq!(body["gate"], "allowed");

    let (status, body) = send(
        &app,
        Method::POST,
        &create_uri,
        Some(json!({ "title": "Flat 4" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["partner_id"], agency.id.to_string());
}

#[tokio::test]
async fn developer_properties_and_units_share_a_verdict() {
    let developer = Partner {
        id: Uuid::new_v4(),
        name: "Skyline Developments".into(),
        plan: Some(SubscriptionPlan::Developer(DeveloperTier::Professional)),
    };
    let resources = (0..50)
        .map(|n| property(developer.id, &format!("Unit {n}")))
        .collect();
    let app = app_with(vec![developer.clone()], resources);

    let (_, by_properties) = send(
        &app,
        Method::GET,
        &format!("/api/partners/{}/usage/properties", developer.id),
        None,
    )
    .await;
    let (_, by_units) = send(
        &app,
        Method::GET,
        &format!("/api/partners/{}/usage/units", developer.id),
        None,
    )
    .await;

    for field in ["count", "limit", "is_limit_reached", "remaining", "gate"] {
        assert_eq!(by_properties[field], by_units[field], "{field}");
    }
    assert_eq!(by_units["limit"], 50);
    assert_eq!(by_units["is_limit_reached"], true);
}

#[tokio::test]
async fn unknown_partner_and_unknown_kind_fail_open() {
    let stranger = Uuid::new_v4();
    let app = app_with(Vec::new(), vec![property(stranger, "Unclaimed")]);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/partners/{stranger}/usage/properties"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["limit"], Value::Null);
    assert_eq!(body["is_limit_reached"], false);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/partners/{stranger}/usage/brochures"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["gate"], "allowed");
}

#[tokio::test]
async fn partner_registration_validates_plan() {
    let app = app_with(Vec::new(), Vec::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/partners",
        Some(json!({
            "name": "Fine Finishes",
            "plan": { "category": "finishing", "tier": "elite" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, &format!("/api/partners/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["tier"], "elite");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/partners",
        Some(json!({
            "name": "Fine Finishes",
            "plan": { "category": "finishing", "tier": "basic" }
        })),
    )
    .await;
    assert!(status.is_client_error());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/partners",
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resource_creation_validates_input() {
    let partner_id = Uuid::new_v4();
    let app = app_with(Vec::new(), Vec::new());

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/partners/{partner_id}/resources/brochures"),
        Some(json!({ "title": "Leaflet" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/partners/{partner_id}/resources/properties"),
        Some(json!({
            "title": "Backwards",
            "listing_start_date": "2026-05-01",
            "listing_end_date": "2026-04-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/resources/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn marketplace_lists_only_active_properties() {
    let owner = Uuid::new_v4();
    let today = Utc::now().date_naive();
    let mut expired = property(owner, "Expired");
    expired.listing_end_date = Some(today - Duration::days(1));
    let mut upcoming = property(owner, "Upcoming");
    upcoming.listing_start_date = Some(today + Duration::days(1));
    let mut current = property(owner, "Current");
    current.listing_start_date = Some(today - Duration::days(7));
    current.listing_end_date = Some(today + Duration::days(7));

    let app = app_with(
        Vec::new(),
        vec![expired, upcoming, current, property(owner, "Open ended")],
    );

    let (status, body) = send(&app, Method::GET, "/api/marketplace/listings", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Current", "Open ended"]);
}
