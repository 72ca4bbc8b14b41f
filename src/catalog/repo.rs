use serde::{Deserialize, Serialize};
use sqlx::{types::Decimal, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pizza {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub created_at: OffsetDateTime,
}

impl Pizza {
    pub async fn list(db: &PgPool) -> Result<Vec<Pizza>, sqlx::Error> {
        sqlx::query_as::<_, Pizza>(
            r#"
            SELECT id, name, description, price, image_url, created_at
            FROM pizzas
            ORDER BY name
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<Pizza>, sqlx::Error> {
        sqlx::query_as::<_, Pizza>(
            r#"
            SELECT id, name, description, price, image_url, created_at
            FROM pizzas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        description: &str,
        price: Decimal,
        image_url: &str,
    ) -> Result<Pizza, sqlx::Error> {
        sqlx::query_as::<_, Pizza>(
            r#"
            INSERT INTO pizzas (name, description, price, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, image_url, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(image_url)
        .fetch_one(db)
        .await
    }
}
