use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::{NewResource, Partner, Resource, ResourceCollection, ResourceStore};

/// key: store-memory -> process-local resource store
/// Default store for local runs and the fixture store for tests.
#[derive(Default)]
pub struct InMemoryResourceStore {
    partners: DashMap<Uuid, Partner>,
    resources: DashMap<Uuid, Resource>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from fixture data, keeping the given ids and timestamps.
    pub fn with_fixtures(partners: Vec<Partner>, resources: Vec<Resource>) -> Self {
        let store = Self::new();
        for partner in partners {
            store.partners.insert(partner.id, partner);
        }
        for resource in resources {
            store.resources.insert(resource.id, resource);
        }
        store
    }

    fn collect(&self, predicate: impl Fn(&Resource) -> bool) -> Vec<Resource> {
        let mut matched: Vec<Resource> = self
            .resources
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        matched
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn partner(&self, partner_id: Uuid) -> Result<Option<Partner>> {
        Ok(self.partners.get(&partner_id).map(|entry| entry.value().clone()))
    }

    async fn upsert_partner(&self, partner: Partner) -> Result<Partner> {
        self.partners.insert(partner.id, partner.clone());
        Ok(partner)
    }

    async fn list(&self, collection: ResourceCollection) -> Result<Vec<Resource>> {
        Ok(self.collect(|resource| resource.collection == collection))
    }

    async fn list_for_partner(
        &self,
        collection: ResourceCollection,
        partner_id: Uuid,
    ) -> Result<Vec<Resource>> {
        Ok(self.collect(|resource| {
            resource.collection == collection && resource.partner_id == partner_id
        }))
    }

    async fn insert(
        &self,
        partner_id: Uuid,
        collection: ResourceCollection,
        resource: NewResource,
    ) -> Result<Resource> {
        let record = Resource {
            id: Uuid::new_v4(),
            partner_id,
            collection,
            title: resource.title,
            listing_start_date: resource.listing_start_date,
            listing_end_date: resource.listing_end_date,
            created_at: Utc::now(),
        };
        self.resources.insert(record.id, record.clone());
        Ok(record)
    }

    async fn remove(&self, resource_id: Uuid) -> Result<Option<Resource>> {
        Ok(self.resources.remove(&resource_id).map(|(_, resource)| resource))
    }
}
