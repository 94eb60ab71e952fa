use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{NewResource, Partner, Resource, ResourceCollection, ResourceStore};
use crate::quota::SubscriptionPlan;

/// key: store-postgres -> partners + partner_resources tables
#[derive(Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn partner_from_row(row: &PgRow) -> Result<Partner> {
    let category: Option<String> = row.try_get("plan_category")?;
    let tier: Option<String> = row.try_get("plan_tier")?;
    // a half-populated or stale plan reads as "no plan" so quota checks fail open
    let plan = match (category, tier) {
        (Some(category), Some(tier)) => match SubscriptionPlan::parse(&category, &tier) {
            Ok(plan) => Some(plan),
            Err(err) => {
                tracing::warn!(%err, "ignoring unrecognised partner plan");
                None
            }
        },
        _ => None,
    };
    Ok(Partner {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        plan,
    })
}

fn resource_from_row(row: &PgRow) -> Result<Resource> {
    let collection: String = row.try_get("collection")?;
    let collection = ResourceCollection::parse(&collection)
        .ok_or_else(|| anyhow!("unknown resource collection `{collection}`"))?;
    Ok(Resource {
        id: row.try_get("id")?,
        partner_id: row.try_get("partner_id")?,
        collection,
        title: row.try_get("title")?,
        listing_start_date: row.try_get("listing_start_date")?,
        listing_end_date: row.try_get("listing_end_date")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn partner(&self, partner_id: Uuid) -> Result<Option<Partner>> {
        let row = sqlx::query(
            "SELECT id, name, plan_category, plan_tier FROM partners WHERE id = $1",
        )
        .bind(partner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(partner_from_row).transpose()
    }

    async fn upsert_partner(&self, partner: Partner) -> Result<Partner> {
        let category = partner.plan.map(|plan| plan.category().as_str());
        let tier = partner.plan.map(|plan| plan.tier_code());
        let row = sqlx::query(
            r#"
            INSERT INTO partners (id, name, plan_category, plan_tier)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                plan_category = EXCLUDED.plan_category,
                plan_tier = EXCLUDED.plan_tier,
                updated_at = NOW()
            RETURNING id, name, plan_category, plan_tier
            "#,
        )
        .bind(partner.id)
        .bind(&partner.name)
        .bind(category)
        .bind(tier)
        .fetch_one(&self.pool)
        .await?;

        partner_from_row(&row)
    }

    async fn list(&self, collection: ResourceCollection) -> Result<Vec<Resource>> {
        let rows = sqlx::query(
            r#"
            SELECT id, partner_id, collection, title, listing_start_date, listing_end_date, created_at
            FROM partner_resources
            WHERE collection = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(resource_from_row).collect()
    }

    async fn list_for_partner(
        &self,
        collection: ResourceCollection,
        partner_id: Uuid,
    ) -> Result<Vec<Resource>> {
        let rows = sqlx::query(
            r#"
            SELECT id, partner_id, collection, title, listing_start_date, listing_end_date, created_at
            FROM partner_resources
            WHERE collection = $1 AND partner_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(resource_from_row).collect()
    }

    async fn insert(
        &self,
        partner_id: Uuid,
        collection: ResourceCollection,
        resource: NewResource,
    ) -> Result<Resource> {
        let row = sqlx::query(
            r#"
            INSERT INTO partner_resources (
                id,
                partner_id,
                collection,
                title,
                listing_start_date,
                listing_end_date
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, partner_id, collection, title, listing_start_date, listing_end_date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(partner_id)
        .bind(collection.as_str())
        .bind(&resource.title)
        .bind(resource.listing_start_date)
        .bind(resource.listing_end_date)
        .fetch_one(&self.pool)
        .await?;

        resource_from_row(&row)
    }

    async fn remove(&self, resource_id: Uuid) -> Result<Option<Resource>> {
        let row = sqlx::query(
            r#"
            DELETE FROM partner_resources
            WHERE id = $1
            RETURNING id, partner_id, collection, title, listing_start_date, listing_end_date, created_at
            "#,
        )
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(resource_from_row).transpose()
    }
}
