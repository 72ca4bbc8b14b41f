use serde::{Deserialize, Serialize};
use sqlx::{types::Decimal, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One-way lifecycle: pending until an admin marks the order completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pizza_id: Uuid,
    pub quantity: i32,
    pub pizza_size: String,
    pub address: String,
    pub payment_method: String,
    pub total_price: Decimal,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub delivery_time: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

pub struct NewOrder<'a> {
    pub user_id: Uuid,
    pub pizza_id: Uuid,
    pub quantity: i32,
    pub pizza_size: &'a str,
    pub address: &'a str,
    pub payment_method: &'a str,
    pub total_price: Decimal,
    pub delivery_time: OffsetDateTime,
}

/// Order joined with user and pizza display fields, for the receipt page.
#[derive(Debug, Clone, FromRow)]
pub struct OrderDetails {
    pub id: Uuid,
    pub username: String,
    pub pizza_name: String,
    pub quantity: i32,
    pub pizza_size: String,
    pub address: String,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub payment_method: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub delivery_time: OffsetDateTime,
}

/// Row of the admin dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub username: String,
    pub pizza_name: String,
    pub quantity: i32,
    pub total_price: Decimal,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub payment_method: String,
}

impl Order {
    pub async fn create(db: &PgPool, new: NewOrder<'_>) -> Result<Order, sqlx::Error> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (user_id, pizza_id, quantity, pizza_size, address, payment_method,
                 total_price, status, delivery_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
            RETURNING id, user_id, pizza_id, quantity, pizza_size, address,
                      payment_method, total_price, status, delivery_time, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(new.pizza_id)
        .bind(new.quantity)
        .bind(new.pizza_size)
        .bind(new.address)
        .bind(new.payment_method)
        .bind(new.total_price)
        .bind(new.delivery_time)
        .fetch_one(db)
        .await
    }

    pub async fn find_with_details(
        db: &PgPool,
        id: Uuid,
    ) -> Result<Option<OrderDetails>, sqlx::Error> {
        sqlx::query_as::<_, OrderDetails>(
            r#"
            SELECT o.id, u.username, p.name AS pizza_name, o.quantity, o.pizza_size,
                   o.address, p.price AS unit_price, o.total_price, o.payment_method,
                   o.status, o.delivery_time
            FROM orders o
            JOIN users u ON u.id = o.user_id
            JOIN pizzas p ON p.id = o.pizza_id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_with_details(db: &PgPool) -> Result<Vec<OrderSummary>, sqlx::Error> {
        sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, u.username, p.name AS pizza_name, o.quantity, o.total_price,
                   o.status, o.payment_method
            FROM orders o
            JOIN users u ON u.id = o.user_id
            JOIN pizzas p ON p.id = o.pizza_id
            ORDER BY o.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Blind one-way transition; retrying on an already-completed order is a
    /// no-op.
    pub async fn mark_completed(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE orders SET status = 'completed' WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
