mod memory;
mod postgres;

pub use memory::InMemoryResourceStore;
pub use postgres::PgResourceStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listing::ListingWindow;
use crate::quota::SubscriptionPlan;

/// key: store-collections -> partner-owned resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCollection {
    Properties,
    Projects,
    Portfolio,
}

impl ResourceCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCollection::Properties => "properties",
            ResourceCollection::Projects => "projects",
            ResourceCollection::Portfolio => "portfolio",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "properties" => Some(ResourceCollection::Properties),
            "projects" => Some(ResourceCollection::Projects),
            "portfolio" => Some(ResourceCollection::Portfolio),
            _ => None,
        }
    }
}

/// key: store-partner -> quota subject
/// `plan` is `None` for partners whose subscription metadata has not been
/// captured yet; quota checks fail open for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub plan: Option<SubscriptionPlan>,
}

/// key: store-resource -> property, project or portfolio item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub collection: ResourceCollection,
    pub title: String,
    pub listing_start_date: Option<NaiveDate>,
    pub listing_end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Resource {
    pub fn listing_window(&self) -> ListingWindow {
        ListingWindow::new(self.listing_start_date, self.listing_end_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewResource {
    pub title: String,
    #[serde(default)]
    pub listing_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub listing_end_date: Option<NaiveDate>,
}

/// key: store-port -> persistence behind the quota service
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn partner(&self, partner_id: Uuid) -> Result<Option<Partner>>;
    async fn upsert_partner(&self, partner: Partner) -> Result<Partner>;
    /// Every resource in `collection`, across all partners.
    async fn list(&self, collection: ResourceCollection) -> Result<Vec<Resource>>;
    /// Resources in `collection` owned by `partner_id`.
    async fn list_for_partner(
        &self,
        collection: ResourceCollection,
        partner_id: Uuid,
    ) -> Result<Vec<Resource>>;
    async fn insert(
        &self,
        partner_id: Uuid,
        collection: ResourceCollection,
        resource: NewResource,
    ) -> Result<Resource>;
    /// Returns the removed resource, or `None` when the id is unknown.
    async fn remove(&self, resource_id: Uuid) -> Result<Option<Resource>>;
}
