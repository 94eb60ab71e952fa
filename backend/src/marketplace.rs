use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::quota::QuotaService;
use crate::store::{Resource, ResourceCollection};

/// key: marketplace-listings -> publicly visible properties
/// Keeps properties whose listing window covers `now`, newest first.
pub fn active_listings(properties: Vec<Resource>, now: DateTime<Utc>) -> Vec<Resource> {
    let mut active: Vec<Resource> = properties
        .into_iter()
        .filter(|resource| resource.collection == ResourceCollection::Properties)
        .filter(|resource| resource.listing_window().is_active(now))
        .collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    active
}

pub async fn list_marketplace(
    Extension(service): Extension<QuotaService>,
) -> AppResult<Json<Vec<Resource>>> {
    let properties = service.store().list(ResourceCollection::Properties).await?;
    Ok(Json(active_listings(properties, Utc::now())))
}
