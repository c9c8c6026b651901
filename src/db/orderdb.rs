use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::ordermodel::{Order, OrderPriority, OrderStatus, OrderWithParties};

#[async_trait]
pub trait OrderExt {
    async fn create_order(
        &self,
        client_id: Uuid,
        title: &str,
        description: &str,
        price: i64,
        priority: OrderPriority,
        executor_id: Option<Uuid>,
    ) -> Result<Order, Error>;

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, Error>;

    async fn get_orders(
        &self,
        limit: i64,
        offset: i64,
        status: Option<OrderStatus>,
        search: Option<&str>,
        // When set, only orders the user participates in.
        participant: Option<Uuid>,
    ) -> Result<Vec<OrderWithParties>, Error>;
}

#[async_trait]
impl OrderExt for DBClient {
    async fn create_order(
        &self,
        client_id: Uuid,
        title: &str,
        description: &str,
        price: i64,
        priority: OrderPriority,
        executor_id: Option<Uuid>,
    ) -> Result<Order, Error> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (client_id, title, description, price, priority, executor_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending')
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(price)
        .bind(priority)
        .bind(executor_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, Error> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn get_orders(
        &self,
        limit: i64,
        offset: i64,
        status: Option<OrderStatus>,
        search: Option<&str>,
        participant: Option<Uuid>,
    ) -> Result<Vec<OrderWithParties>, Error> {
        let orders = sqlx::query_as::<_, OrderWithParties>(
            r#"
            SELECT
                o.*,
                c.name AS client_name,
                e.name AS executor_name
            FROM orders o
            JOIN users c ON o.client_id = c.id
            LEFT JOIN users e ON o.executor_id = e.id
            WHERE ($1::order_status IS NULL OR o.status = $1)
              AND ($2::text IS NULL OR o.title ILIKE '%' || $2 || '%'
                   OR o.description ILIKE '%' || $2 || '%')
              AND ($3::uuid IS NULL OR o.client_id = $3 OR o.executor_id = $3)
            ORDER BY o.created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(status)
        .bind(search)
        .bind(participant)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}
