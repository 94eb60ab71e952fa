use uuid::Uuid;

use super::limits::{plan_limit, UNCONFIGURED_QUOTA};
use super::models::{Quota, ResourceKind, SubscriptionPlan, UsageVerdict};
use crate::store::{Partner, Resource, ResourceCollection};

/// key: usage-snapshot -> collections an evaluation reads from
/// The evaluator never mutates these; callers take a fresh snapshot after
/// every create or delete.
#[derive(Debug, Clone, Default)]
pub struct ResourceSnapshot {
    pub properties: Vec<Resource>,
    pub projects: Vec<Resource>,
    pub portfolio: Vec<Resource>,
}

impl ResourceSnapshot {
    pub fn new(properties: Vec<Resource>, projects: Vec<Resource>, portfolio: Vec<Resource>) -> Self {
        Self {
            properties,
            projects,
            portfolio,
        }
    }

    /// Snapshot holding a single collection, the others left empty.
    pub fn of(collection: ResourceCollection, resources: Vec<Resource>) -> Self {
        let mut snapshot = Self::default();
        *snapshot.collection_mut(collection) = resources;
        snapshot
    }

    pub fn collection(&self, collection: ResourceCollection) -> &[Resource] {
        match collection {
            ResourceCollection::Properties => &self.properties,
            ResourceCollection::Projects => &self.projects,
            ResourceCollection::Portfolio => &self.portfolio,
        }
    }

    fn collection_mut(&mut self, collection: ResourceCollection) -> &mut Vec<Resource> {
        match collection {
            ResourceCollection::Properties => &mut self.properties,
            ResourceCollection::Projects => &mut self.projects,
            ResourceCollection::Portfolio => &mut self.portfolio,
        }
    }
}

/// Resources of the collection behind `kind` owned by `partner_id`.
pub fn owned_resources<'a>(
    partner_id: Uuid,
    kind: ResourceKind,
    snapshot: &'a ResourceSnapshot,
) -> impl Iterator<Item = &'a Resource> {
    snapshot
        .collection(kind.collection())
        .iter()
        .filter(move |resource| resource.partner_id == partner_id)
}

/// Partners without plan metadata are never limited.
pub fn limit_for(plan: Option<SubscriptionPlan>, kind: ResourceKind) -> Quota {
    plan.map(|plan| plan_limit(plan, kind))
        .unwrap_or(UNCONFIGURED_QUOTA)
}

/// key: usage-evaluator -> count owned resources against the plan quota
/// Every owned resource counts, whether or not its listing window is active.
pub fn evaluate_usage(
    partner: &Partner,
    kind: ResourceKind,
    snapshot: &ResourceSnapshot,
) -> UsageVerdict {
    let count = owned_resources(partner.id, kind, snapshot).count();
    UsageVerdict::new(count, limit_for(partner.plan, kind))
}

/// Verdict for a kind code that names no known resource kind: nothing is
/// counted and nothing is limited.
pub fn unrecognized_kind_verdict() -> UsageVerdict {
    UsageVerdict::new(0, UNCONFIGURED_QUOTA)
}
