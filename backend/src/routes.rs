use axum::{routing::get, Router};

use crate::{marketplace, partners, quota};

pub fn api_routes() -> Router {
    Router::new()
        .route("/api/marketplace/listings", get(marketplace::list_marketplace))
        .route("/api/plans", get(quota::quota_list_plan_table))
        .route(
            "/api/plans/:category/:tier/limits",
            get(quota::quota_get_plan_limits),
        )
        .route(
            "/api/partners/:id/usage/:kind",
            get(quota::quota_get_usage),
        )
        .merge(partners::routes())
}
