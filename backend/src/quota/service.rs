use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{ResourceKind, UsageVerdict};
use super::usage::{evaluate_usage, limit_for, unrecognized_kind_verdict, ResourceSnapshot};
use crate::store::{NewResource, Resource, ResourceCollection, ResourceStore};

/// key: quota-gate -> allow the action or send the partner to upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaGate {
    Allowed,
    UpgradeRequired,
}

impl QuotaGate {
    pub fn from_verdict(verdict: &UsageVerdict) -> Self {
        if verdict.is_limit_reached {
            QuotaGate::UpgradeRequired
        } else {
            QuotaGate::Allowed
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResourceCreation {
    Created(Resource),
    Rejected(UsageVerdict),
}

/// key: quota-service -> store snapshot + evaluator + action gating
#[derive(Clone)]
pub struct QuotaService {
    store: Arc<dyn ResourceStore>,
}

impl QuotaService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    /// Recomputes the verdict from the store's current state. Unknown
    /// partners are evaluated without a plan and therefore never limited.
    pub async fn usage(&self, partner_id: Uuid, kind: ResourceKind) -> Result<UsageVerdict> {
        let collection = kind.collection();
        let owned = self.store.list_for_partner(collection, partner_id).await?;
        let snapshot = ResourceSnapshot::of(collection, owned);

        let verdict = match self.store.partner(partner_id).await? {
            Some(partner) => evaluate_usage(&partner, kind, &snapshot),
            None => {
                debug!(%partner_id, "partner not found; evaluating without plan limits");
                UsageVerdict::new(
                    snapshot.collection(collection).len(),
                    limit_for(None, kind),
                )
            }
        };

        debug!(
            %partner_id,
            kind = kind.as_str(),
            count = verdict.count,
            limit = ?verdict.limit.as_limit(),
            reached = verdict.is_limit_reached,
            "evaluated partner usage"
        );
        Ok(verdict)
    }

    /// Same as [`QuotaService::usage`] for a raw kind code; codes naming no
    /// resource kind yield an empty, unlimited verdict.
    pub async fn usage_for_code(&self, partner_id: Uuid, kind: &str) -> Result<UsageVerdict> {
        match ResourceKind::parse(kind) {
            Some(kind) => self.usage(partner_id, kind).await,
            None => {
                debug!(%partner_id, kind, "unrecognised resource kind");
                Ok(unrecognized_kind_verdict())
            }
        }
    }

    pub async fn gate(&self, partner_id: Uuid, kind: ResourceKind) -> Result<QuotaGate> {
        let verdict = self.usage(partner_id, kind).await?;
        Ok(QuotaGate::from_verdict(&verdict))
    }

    /// Inserts the resource unless the partner already sits at the quota for
    /// its collection.
    pub async fn create_resource(
        &self,
        partner_id: Uuid,
        collection: ResourceCollection,
        resource: NewResource,
    ) -> Result<ResourceCreation> {
        let kind = ResourceKind::for_collection(collection);
        let verdict = self.usage(partner_id, kind).await?;
        if verdict.is_limit_reached {
            info!(
                %partner_id,
                kind = kind.as_str(),
                count = verdict.count,
                limit = ?verdict.limit.as_limit(),
                "quota reached; upgrade required"
            );
            return Ok(ResourceCreation::Rejected(verdict));
        }

        let created = self.store.insert(partner_id, collection, resource).await?;
        info!(
            %partner_id,
            resource = %created.id,
            collection = collection.as_str(),
            "created partner resource"
        );
        Ok(ResourceCreation::Created(created))
    }

    pub async fn remove_resource(&self, resource_id: Uuid) -> Result<Option<Resource>> {
        let removed = self.store.remove(resource_id).await?;
        if let Some(resource) = &removed {
            info!(
                partner_id = %resource.partner_id,
                resource = %resource.id,
                collection = resource.collection.as_str(),
                "removed partner resource"
            );
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::models::{AgencyTier, DeveloperTier, Quota, SubscriptionPlan};
    use crate::store::{InMemoryResourceStore, Partner};

    fn listing(title: &str) -> NewResource {
        NewResource {
            title: title.into(),
            ..Default::default()
        }
    }

    async fn service_with(plan: Option<SubscriptionPlan>) -> (QuotaService, Uuid) {
        let store = Arc::new(InMemoryResourceStore::new());
        let partner_id = Uuid::new_v4();
        store
            .upsert_partner(Partner {
                id: partner_id,
                name: "Harbour Homes".into(),
                plan,
            })
            .await
            .unwrap();
        (QuotaService::new(store), partner_id)
    }

    #[tokio::test]
    async fn verdict_tracks_removals() {
        let (service, partner_id) =
            service_with(Some(SubscriptionPlan::Agency(AgencyTier::Basic))).await;
        let mut created = Vec::new();
        for title in ["Flat 1", "Flat 2", "Flat 3"] {
            match service
                .create_resource(partner_id, ResourceCollection::Properties, listing(title))
                .await
                .unwrap()
            {
                ResourceCreation::Created(resource) => created.push(resource),
                ResourceCreation::Rejected(verdict) => panic!("rejected below cap: {verdict:?}"),
            }
        }

        let verdict = service
            .usage(partner_id, ResourceKind::Properties)
            .await
            .unwrap();
        assert_eq!(verdict.count, 3);
        assert!(verdict.is_limit_reached);
        assert_eq!(
            service
                .gate(partner_id, ResourceKind::Properties)
                .await
                .unwrap(),
            QuotaGate::UpgradeRequired
        );

        service.remove_resource(created[0].id).await.unwrap();
        let verdict = service
            .usage(partner_id, ResourceKind::Properties)
            .await
            .unwrap();
        assert_eq!(verdict.count, 2);
        assert!(!verdict.is_limit_reached);
    }

    #[tokio::test]
    async fn creation_at_cap_leaves_store_untouched() {
        let (service, partner_id) =
            service_with(Some(SubscriptionPlan::Agency(AgencyTier::PaidListing))).await;
        let first = service
            .create_resource(partner_id, ResourceCollection::Properties, listing("Only one"))
            .await
            .unwrap();
        assert!(matches!(first, ResourceCreation::Created(_)));

        let second = service
            .create_resource(partner_id, ResourceCollection::Properties, listing("One too many"))
            .await
            .unwrap();
        let ResourceCreation::Rejected(verdict) = second else {
            panic!("second listing should be rejected");
        };
        assert_eq!(verdict.limit, Quota::Limited(1));

        let stored = service
            .store()
            .list_for_partner(ResourceCollection::Properties, partner_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn developer_properties_use_the_units_quota() {
        let (service, partner_id) =
            service_with(Some(SubscriptionPlan::Developer(DeveloperTier::Basic))).await;
        let by_properties = service
            .usage(partner_id, ResourceKind::Properties)
            .await
            .unwrap();
        let by_units = service.usage(partner_id, ResourceKind::Units).await.unwrap();
        assert_eq!(by_properties, by_units);
        assert_eq!(by_units.limit, Quota::Limited(10));
    }

    #[tokio::test]
    async fn unknown_partner_fails_open() {
        let store = Arc::new(InMemoryResourceStore::new());
        let stranger = Uuid::new_v4();
        store
            .insert(stranger, ResourceCollection::Projects, listing("Orphan"))
            .await
            .unwrap();
        let service = QuotaService::new(store);

        let verdict = service
            .usage(stranger, ResourceKind::Projects)
            .await
            .unwrap();
        assert_eq!(verdict.count, 1);
        assert_eq!(verdict.limit, Quota::Unbounded);
        assert!(!verdict.is_limit_reached);
    }

    #[tokio::test]
    async fn unknown_kind_code_yields_empty_verdict() {
        let (service, partner_id) =
            service_with(Some(SubscriptionPlan::Agency(AgencyTier::Commission))).await;
        let verdict = service
            .usage_for_code(partner_id, "brochures")
            .await
            .unwrap();
        assert_eq!(verdict.count, 0);
        assert!(!verdict.is_limit_reached);

        let verdict = service
            .usage_for_code(partner_id, "properties")
            .await
            .unwrap();
        assert!(verdict.is_limit_reached);
    }
}
