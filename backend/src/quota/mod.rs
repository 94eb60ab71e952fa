pub mod api;
pub mod limits;
pub mod models;
pub mod service;
pub mod usage;

pub use api::{
    get_plan_limits as quota_get_plan_limits, get_usage as quota_get_usage,
    list_plan_table as quota_list_plan_table, PlanLimitsResponse, UsageResponse,
};
pub use limits::{
    normalize_kind, plan_limit, plan_limits, unconfigured_pairs, PlanLimitEntry, PLAN_LIMITS,
    UNCONFIGURED_QUOTA,
};
pub use models::{
    AgencyTier, DeveloperTier, FinishingTier, PartnerCategory, PlanCode, PlanParseError, Quota,
    ResourceKind, SubscriptionPlan, UsageVerdict,
};
pub use service::{QuotaGate, QuotaService, ResourceCreation};
pub use usage::{evaluate_usage, limit_for, owned_resources, ResourceSnapshot};
