use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::reviewmodel::{ModerationStatus, Review, ReviewWithAuthor};

#[async_trait]
pub trait ReviewExt {
    async fn create_review(
        &self,
        order_id: Uuid,
        author_id: Uuid,
        target_id: Uuid,
        rating: i32,
        comment: &str,
        initial_status: ModerationStatus,
    ) -> Result<Review, Error>;

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, Error>;

    async fn get_reviews(
        &self,
        limit: i64,
        offset: i64,
        moderation_status: Option<ModerationStatus>,
    ) -> Result<Vec<ReviewWithAuthor>, Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        order_id: Uuid,
        author_id: Uuid,
        target_id: Uuid,
        rating: i32,
        comment: &str,
        initial_status: ModerationStatus,
    ) -> Result<Review, Error> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (order_id, author_id, target_id, rating, comment, moderation_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(author_id)
        .bind(target_id)
        .bind(rating)
        .bind(comment)
        .bind(initial_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_review(&self, review_id: Uuid) -> Result<Option<Review>, Error> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    async fn get_reviews(
        &self,
        limit: i64,
        offset: i64,
        moderation_status: Option<ModerationStatus>,
    ) -> Result<Vec<ReviewWithAuthor>, Error> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT
                rv.*,
                u.name AS author_name,
                u.username AS author_username
            FROM reviews rv
            JOIN users u ON rv.author_id = u.id
            WHERE ($1::moderation_status IS NULL OR rv.moderation_status = $1)
            ORDER BY rv.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(moderation_status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
