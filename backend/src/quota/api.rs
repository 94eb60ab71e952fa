use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::{
    plan_limits, PlanLimitEntry, Quota, QuotaGate, QuotaService, SubscriptionPlan, PLAN_LIMITS,
};
use crate::error::AppResult;

/// key: quota-api -> rest endpoints
pub async fn list_plan_table() -> Json<Vec<PlanLimitEntry>> {
    Json(PLAN_LIMITS.to_vec())
}

pub async fn get_plan_limits(
    Path((category, tier)): Path<(String, String)>,
) -> AppResult<Json<PlanLimitsResponse>> {
    let plan = SubscriptionPlan::parse(&category, &tier)?;
    let limits = plan_limits(plan)
        .into_iter()
        .map(|(kind, limit)| KindLimit {
            kind: kind.as_str(),
            limit,
        })
        .collect();
    Ok(Json(PlanLimitsResponse { plan, limits }))
}

pub async fn get_usage(
    Extension(service): Extension<QuotaService>,
    Path((partner_id, kind)): Path<(Uuid, String)>,
) -> AppResult<Json<UsageResponse>> {
    let verdict = service.usage_for_code(partner_id, &kind).await?;
    Ok(Json(UsageResponse {
        partner_id,
        kind,
        count: verdict.count,
        limit: verdict.limit,
        is_limit_reached: verdict.is_limit_reached,
        remaining: verdict.limit.remaining(verdict.count),
        gate: QuotaGate::from_verdict(&verdict),
    }))
}

#[derive(Debug, Serialize)]
pub struct KindLimit {
    pub kind: &'static str,
    pub limit: Quota,
}

#[derive(Debug, Serialize)]
pub struct PlanLimitsResponse {
    pub plan: SubscriptionPlan,
    pub limits: Vec<KindLimit>,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub partner_id: Uuid,
    pub kind: String,
    pub count: usize,
    pub limit: Quota,
    pub is_limit_reached: bool,
    pub remaining: Option<usize>,
    pub gate: QuotaGate,
}
