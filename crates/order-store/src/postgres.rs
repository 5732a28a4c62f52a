//! PostgreSQL-backed order store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use domain::{LineItem, Order, OrderQuery, OrderStatus, ShippingAddress};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{OrderStore, Result, StoreError};

const SELECT_COLUMNS: &str =
    "id, user_id, items, total_cents, shipping_address, status, created_at, updated_at";

/// Order store backed by PostgreSQL.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items: Vec<LineItem> =
            serde_json::from_value(row.try_get::<serde_json::Value, _>("items")?)?;
        let shipping_address: ShippingAddress =
            serde_json::from_value(row.try_get::<serde_json::Value, _>("shipping_address")?)?;
        let status: OrderStatus = serde_json::from_value(serde_json::Value::String(
            row.try_get::<String, _>("status")?,
        ))?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            items,
            total_amount: Money::from_cents(row.try_get::<i64, _>("total_cents")?),
            shipping_address,
            status,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
            updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: Order) -> Result<Order> {
        let items = serde_json::to_value(&order.items)?;
        let shipping_address = serde_json::to_value(&order.shipping_address)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, items, total_cents, shipping_address, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(items)
        .bind(order.total_amount.cents())
        .bind(shipping_address)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_by_query(&self, query: &OrderQuery) -> Result<(Vec<Order>, u64)> {
        let (rows, total) = if let Some(status) = query.status {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;

            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM orders WHERE status = $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
            ))
            .bind(status.as_str())
            .bind(query.limit as i64)
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

            (rows, total)
        } else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
                .fetch_one(&self.pool)
                .await?;

            let rows = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM orders \
                 ORDER BY created_at DESC LIMIT $1 OFFSET $2"
            ))
            .bind(query.limit as i64)
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

            (rows, total)
        };

        let orders: Result<Vec<Order>> = rows.into_iter().map(Self::row_to_order).collect();
        Ok((orders?, total as u64))
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_order(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
