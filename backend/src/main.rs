use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use partner_quotas::config::{self, ResourceStoreDriver};
use partner_quotas::quota::{unconfigured_pairs, QuotaService};
use partner_quotas::store::{InMemoryResourceStore, PgResourceStore, ResourceStore};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

async fn connect_store() -> Result<Arc<dyn ResourceStore>, Box<dyn std::error::Error>> {
    match *config::RESOURCE_STORE {
        ResourceStoreDriver::Memory => Ok(Arc::new(InMemoryResourceStore::new())),
        ResourceStoreDriver::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(*config::DATABASE_MAX_CONNECTIONS)
                .connect(config::DATABASE_URL.as_str())
                .await?;

            if let Err(error) = sqlx::migrate!().run(&pool).await {
                if *config::ALLOW_MIGRATION_FAILURE {
                    tracing::warn!(
                        ?error,
                        "Database migrations failed but continuing due to ALLOW_MIGRATION_FAILURE"
                    );
                } else {
                    return Err(Box::new(error) as Box<dyn std::error::Error>);
                }
            }
            Ok(Arc::new(PgResourceStore::new(pool)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    dotenvy::dotenv().ok();

    for (plan, kind) in unconfigured_pairs() {
        tracing::debug!(
            category = plan.category().as_str(),
            tier = plan.tier_code(),
            kind = kind.as_str(),
            "no quota configured; falling back to unbounded"
        );
    }

    let store = connect_store().await?;
    tracing::info!(
        store = config::RESOURCE_STORE.as_str(),
        "resource store ready"
    );

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let app = partner_quotas::app(QuotaService::new(store))
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .layer(prometheus_layer);

    let addr: SocketAddr = format!("{}:{}", config::BIND_ADDRESS.as_str(), *config::BIND_PORT)
        .parse()
        .map_err(|error| Box::new(error) as Box<dyn std::error::Error>)?;
    tracing::info!(%addr, "Listening for incoming connections");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
