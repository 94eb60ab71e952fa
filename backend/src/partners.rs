use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::quota::{QuotaService, ResourceCreation, ResourceKind, SubscriptionPlan};
use crate::store::{NewResource, Partner, Resource, ResourceCollection};

#[derive(Deserialize)]
pub struct NewPartner {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub plan: Option<SubscriptionPlan>,
}

pub fn routes() -> Router {
    Router::new()
        .route("/api/partners", post(upsert_partner))
        .route("/api/partners/:id", get(get_partner))
        .route(
            "/api/partners/:id/resources/:collection",
            get(list_resources).post(create_resource),
        )
        .route("/api/resources/:id", delete(delete_resource))
}

fn parse_collection(raw: &str) -> AppResult<ResourceCollection> {
    ResourceCollection::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("unknown resource collection `{raw}`")))
}

pub async fn upsert_partner(
    Extension(service): Extension<QuotaService>,
    Json(payload): Json<NewPartner>,
) -> AppResult<Json<Partner>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name required".into()));
    }
    let partner = Partner {
        id: payload.id.unwrap_or_else(Uuid::new_v4),
        name: payload.name.trim().to_string(),
        plan: payload.plan,
    };
    let partner = service.store().upsert_partner(partner).await?;
    tracing::info!(
        partner_id = %partner.id,
        category = partner.plan.map(|plan| plan.category().as_str()),
        tier = partner.plan.map(|plan| plan.tier_code()),
        "registered partner"
    );
    Ok(Json(partner))
}

pub async fn get_partner(
    Extension(service): Extension<QuotaService>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Partner>> {
    let partner = service.store().partner(id).await?;
    partner.map(Json).ok_or(AppError::NotFound)
}

pub async fn list_resources(
    Extension(service): Extension<QuotaService>,
    Path((id, collection)): Path<(Uuid, String)>,
) -> AppResult<Json<Vec<Resource>>> {
    let collection = parse_collection(&collection)?;
    let resources = service.store().list_for_partner(collection, id).await?;
    Ok(Json(resources))
}

pub async fn create_resource(
    Extension(service): Extension<QuotaService>,
    Path((id, collection)): Path<(Uuid, String)>,
    Json(payload): Json<NewResource>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    let collection = parse_collection(&collection)?;
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title required".into()));
    }
    if let (Some(start), Some(end)) = (payload.listing_start_date, payload.listing_end_date) {
        if start > end {
            return Err(AppError::BadRequest(
                "listing_start_date must not be after listing_end_date".into(),
            ));
        }
    }

    match service.create_resource(id, collection, payload).await? {
        ResourceCreation::Created(resource) => Ok((StatusCode::CREATED, Json(resource))),
        ResourceCreation::Rejected(verdict) => Err(AppError::QuotaExceeded {
            kind: ResourceKind::for_collection(collection),
            verdict,
        }),
    }
}

pub async fn delete_resource(
    Extension(service): Extension<QuotaService>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    match service.remove_resource(id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(AppError::NotFound),
    }
}
