use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::ResourceCollection;

/// key: quota-models -> categories,tiers,kinds,verdicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerCategory {
    Developer,
    Agency,
    Finishing,
}

impl PartnerCategory {
    pub const ALL: [PartnerCategory; 3] = [
        PartnerCategory::Developer,
        PartnerCategory::Agency,
        PartnerCategory::Finishing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartnerCategory::Developer => "developer",
            PartnerCategory::Agency => "agency",
            PartnerCategory::Finishing => "finishing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "developer" => Some(PartnerCategory::Developer),
            "agency" => Some(PartnerCategory::Agency),
            "finishing" => Some(PartnerCategory::Finishing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeveloperTier {
    Basic,
    Professional,
    Elite,
}

impl DeveloperTier {
    pub const ALL: [DeveloperTier; 3] = [
        DeveloperTier::Basic,
        DeveloperTier::Professional,
        DeveloperTier::Elite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeveloperTier::Basic => "basic",
            DeveloperTier::Professional => "professional",
            DeveloperTier::Elite => "elite",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgencyTier {
    Basic,
    Professional,
    Elite,
    Commission,
    PaidListing,
}

impl AgencyTier {
    pub const ALL: [AgencyTier; 5] = [
        AgencyTier::Basic,
        AgencyTier::Professional,
        AgencyTier::Elite,
        AgencyTier::Commission,
        AgencyTier::PaidListing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyTier::Basic => "basic",
            AgencyTier::Professional => "professional",
            AgencyTier::Elite => "elite",
            AgencyTier::Commission => "commission",
            AgencyTier::PaidListing => "paid_listing",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishingTier {
    Commission,
    Professional,
    Elite,
}

impl FinishingTier {
    pub const ALL: [FinishingTier; 3] = [
        FinishingTier::Commission,
        FinishingTier::Professional,
        FinishingTier::Elite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinishingTier::Commission => "commission",
            FinishingTier::Professional => "professional",
            FinishingTier::Elite => "elite",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.as_str() == value)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanParseError {
    #[error("unknown partner category `{0}`")]
    UnknownCategory(String),
    #[error("plan tier `{tier}` is not offered to `{category}` partners")]
    TierNotOffered {
        category: &'static str,
        tier: String,
    },
}

/// key: quota-plan -> category-scoped subscription tier
/// A tier only exists inside the category that offers it, so an agency-only
/// tier such as `paid_listing` cannot be attached to a developer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlanCode", into = "PlanCode")]
pub enum SubscriptionPlan {
    Developer(DeveloperTier),
    Agency(AgencyTier),
    Finishing(FinishingTier),
}

impl SubscriptionPlan {
    pub fn category(&self) -> PartnerCategory {
        match self {
            SubscriptionPlan::Developer(_) => PartnerCategory::Developer,
            SubscriptionPlan::Agency(_) => PartnerCategory::Agency,
            SubscriptionPlan::Finishing(_) => PartnerCategory::Finishing,
        }
    }

    pub fn tier_code(&self) -> &'static str {
        match self {
            SubscriptionPlan::Developer(tier) => tier.as_str(),
            SubscriptionPlan::Agency(tier) => tier.as_str(),
            SubscriptionPlan::Finishing(tier) => tier.as_str(),
        }
    }

    pub fn parse(category: &str, tier: &str) -> Result<Self, PlanParseError> {
        let category = PartnerCategory::parse(category)
            .ok_or_else(|| PlanParseError::UnknownCategory(category.trim().to_string()))?;
        let normalized = tier.trim().to_ascii_lowercase();
        let plan = match category {
            PartnerCategory::Developer => {
                DeveloperTier::parse(&normalized).map(SubscriptionPlan::Developer)
            }
            PartnerCategory::Agency => AgencyTier::parse(&normalized).map(SubscriptionPlan::Agency),
            PartnerCategory::Finishing => {
                FinishingTier::parse(&normalized).map(SubscriptionPlan::Finishing)
            }
        };
        plan.ok_or(PlanParseError::TierNotOffered {
            category: category.as_str(),
            tier: normalized,
        })
    }

    /// Every plan offered across all categories.
    pub fn all() -> Vec<SubscriptionPlan> {
        DeveloperTier::ALL
            .into_iter()
            .map(SubscriptionPlan::Developer)
            .chain(AgencyTier::ALL.into_iter().map(SubscriptionPlan::Agency))
            .chain(FinishingTier::ALL.into_iter().map(SubscriptionPlan::Finishing))
            .collect()
    }
}

/// Wire form of a [`SubscriptionPlan`]: `{"category": "agency", "tier": "basic"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanCode {
    pub category: String,
    pub tier: String,
}

impl TryFrom<PlanCode> for SubscriptionPlan {
    type Error = PlanParseError;

    fn try_from(code: PlanCode) -> Result<Self, Self::Error> {
        SubscriptionPlan::parse(&code.category, &code.tier)
    }
}

impl From<SubscriptionPlan> for PlanCode {
    fn from(plan: SubscriptionPlan) -> Self {
        PlanCode {
            category: plan.category().as_str().to_string(),
            tier: plan.tier_code().to_string(),
        }
    }
}

/// key: quota-resource-kind -> what a quota counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Properties,
    Projects,
    Units,
    Portfolio,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Properties,
        ResourceKind::Projects,
        ResourceKind::Units,
        ResourceKind::Portfolio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Properties => "properties",
            ResourceKind::Projects => "projects",
            ResourceKind::Units => "units",
            ResourceKind::Portfolio => "portfolio",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    /// Collection whose members are counted for this kind. Units are
    /// properties.
    pub fn collection(&self) -> ResourceCollection {
        match self {
            ResourceKind::Properties | ResourceKind::Units => ResourceCollection::Properties,
            ResourceKind::Projects => ResourceCollection::Projects,
            ResourceKind::Portfolio => ResourceCollection::Portfolio,
        }
    }

    /// Kind whose quota gates additions to `collection`.
    pub fn for_collection(collection: ResourceCollection) -> Self {
        match collection {
            ResourceCollection::Properties => ResourceKind::Properties,
            ResourceCollection::Projects => ResourceKind::Projects,
            ResourceCollection::Portfolio => ResourceKind::Portfolio,
        }
    }
}

/// key: quota-value -> hard cap or unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Quota {
    Limited(u32),
    Unbounded,
}

impl Quota {
    pub fn as_limit(&self) -> Option<u32> {
        match self {
            Quota::Limited(limit) => Some(*limit),
            Quota::Unbounded => None,
        }
    }

    /// A partner holding exactly `limit` resources has already reached it.
    pub fn is_reached_by(&self, count: usize) -> bool {
        match self {
            Quota::Limited(limit) => count >= *limit as usize,
            Quota::Unbounded => false,
        }
    }

    pub fn remaining(&self, count: usize) -> Option<usize> {
        self.as_limit()
            .map(|limit| (limit as usize).saturating_sub(count))
    }
}

impl From<Option<u32>> for Quota {
    fn from(value: Option<u32>) -> Self {
        value.map(Quota::Limited).unwrap_or(Quota::Unbounded)
    }
}

impl From<Quota> for Option<u32> {
    fn from(quota: Quota) -> Self {
        quota.as_limit()
    }
}

/// key: quota-verdict -> derived per request, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageVerdict {
    pub count: usize,
    pub limit: Quota,
    pub is_limit_reached: bool,
}

impl UsageVerdict {
    pub fn new(count: usize, limit: Quota) -> Self {
        Self {
            count,
            limit,
            is_limit_reached: limit.is_reached_by(count),
        }
    }
}
