pub mod config;
pub mod error;
pub mod listing;
pub mod marketplace;
pub mod partners;
pub mod quota;
pub mod routes;
pub mod store;

use axum::{routing::get, Extension, Router};

pub use listing::{is_listing_active, ListingWindow};
pub use quota::QuotaService;

async fn root() -> &'static str {
    "Partner Quotas API"
}

/// Router with every endpoint wired to `service`, without the metrics layer.
pub fn app(service: QuotaService) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(routes::api_routes())
        .layer(Extension(service))
}
