use serde::Serialize;

use super::models::{
    AgencyTier, DeveloperTier, FinishingTier, PartnerCategory, Quota, ResourceKind,
    SubscriptionPlan,
};

/// Quota granted to any (plan, kind) pair missing from [`PLAN_LIMITS`].
pub const UNCONFIGURED_QUOTA: Quota = Quota::Unbounded;

/// key: plan-limits -> static quota row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimitEntry {
    pub plan: SubscriptionPlan,
    pub kind: ResourceKind,
    pub quota: Quota,
}

const fn entry(plan: SubscriptionPlan, kind: ResourceKind, quota: Quota) -> PlanLimitEntry {
    PlanLimitEntry { plan, kind, quota }
}

/// key: plan-limits -> process-wide quota table
/// Developer rows are keyed by `units`; `properties` requests are folded onto
/// them by [`normalize_kind`].
pub static PLAN_LIMITS: &[PlanLimitEntry] = &[
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Basic),
        ResourceKind::Units,
        Quota::Limited(10),
    ),
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Professional),
        ResourceKind::Units,
        Quota::Limited(50),
    ),
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Elite),
        ResourceKind::Units,
        Quota::Unbounded,
    ),
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Basic),
        ResourceKind::Projects,
        Quota::Limited(1),
    ),
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Professional),
        ResourceKind::Projects,
        Quota::Limited(5),
    ),
    entry(
        SubscriptionPlan::Developer(DeveloperTier::Elite),
        ResourceKind::Projects,
        Quota::Unbounded,
    ),
    entry(
        SubscriptionPlan::Agency(AgencyTier::Basic),
        ResourceKind::Properties,
        Quota::Limited(3),
    ),
    entry(
        SubscriptionPlan::Agency(AgencyTier::Professional),
        ResourceKind::Properties,
        Quota::Limited(25),
    ),
    entry(
        SubscriptionPlan::Agency(AgencyTier::Elite),
        ResourceKind::Properties,
        Quota::Unbounded,
    ),
    // commission plans carry no self-listing allowance
    entry(
        SubscriptionPlan::Agency(AgencyTier::Commission),
        ResourceKind::Properties,
        Quota::Limited(0),
    ),
    entry(
        SubscriptionPlan::Agency(AgencyTier::PaidListing),
        ResourceKind::Properties,
        Quota::Limited(1),
    ),
    entry(
        SubscriptionPlan::Finishing(FinishingTier::Commission),
        ResourceKind::Portfolio,
        Quota::Limited(5),
    ),
    entry(
        SubscriptionPlan::Finishing(FinishingTier::Professional),
        ResourceKind::Portfolio,
        Quota::Limited(20),
    ),
    entry(
        SubscriptionPlan::Finishing(FinishingTier::Elite),
        ResourceKind::Portfolio,
        Quota::Unbounded,
    ),
];

/// Developers count properties and units against the same `units` quota.
pub fn normalize_kind(category: PartnerCategory, kind: ResourceKind) -> ResourceKind {
    match (category, kind) {
        (PartnerCategory::Developer, ResourceKind::Properties | ResourceKind::Units) => {
            ResourceKind::Units
        }
        _ => kind,
    }
}

fn lookup(plan: SubscriptionPlan, kind: ResourceKind) -> Option<Quota> {
    let kind = normalize_kind(plan.category(), kind);
    PLAN_LIMITS
        .iter()
        .find(|entry| entry.plan == plan && entry.kind == kind)
        .map(|entry| entry.quota)
}

/// key: plan-limits -> lookup with unbounded fallback
pub fn plan_limit(plan: SubscriptionPlan, kind: ResourceKind) -> Quota {
    lookup(plan, kind).unwrap_or(UNCONFIGURED_QUOTA)
}

/// Quota for every resource kind under `plan`, in [`ResourceKind::ALL`] order.
pub fn plan_limits(plan: SubscriptionPlan) -> Vec<(ResourceKind, Quota)> {
    ResourceKind::ALL
        .into_iter()
        .map(|kind| (kind, plan_limit(plan, kind)))
        .collect()
}

/// Pairs that resolve through [`UNCONFIGURED_QUOTA`] rather than a table row.
pub fn unconfigured_pairs() -> Vec<(SubscriptionPlan, ResourceKind)> {
    SubscriptionPlan::all()
        .into_iter()
        .flat_map(|plan| ResourceKind::ALL.into_iter().map(move |kind| (plan, kind)))
        .filter(|(plan, kind)| lookup(*plan, *kind).is_none())
        .collect()
}
