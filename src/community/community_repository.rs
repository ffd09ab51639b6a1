use crate::error::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::community_models::{ClubPost, Comment, EventPost};

#[derive(Clone)]
pub struct CommunityRepository {
    pool: PgPool,
}

impl CommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_event_post(
        &self,
        author_id: i64,
        title: &str,
        content: &str,
        location: Option<&str>,
        event_at: Option<DateTime<Utc>>,
    ) -> Result<EventPost> {
        let post = sqlx::query_as::<_, EventPost>(
            "INSERT INTO event_posts (author_id, title, content, location, event_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(author_id)
        .bind(title)
        .bind(content)
        .bind(location)
        .bind(event_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn find_event_post(&self, event_id: i64) -> Result<Option<EventPost>> {
        let post = sqlx::query_as::<_, EventPost>("SELECT * FROM event_posts WHERE id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    pub async fn list_event_posts(&self, limit: i64, offset: i64) -> Result<Vec<EventPost>> {
        let posts = sqlx::query_as::<_, EventPost>(
            "SELECT * FROM event_posts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_event_posts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn event_author_id(&self, event_id: i64) -> Result<Option<i64>> {
        let author_id: Option<i64> =
            sqlx::query_scalar("SELECT author_id FROM event_posts WHERE id = $1")
                .bind(event_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(author_id)
    }

    pub async fn create_comment(
        &self,
        event_post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (event_post_id, author_id, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(event_post_id)
        .bind(author_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    pub async fn list_comments(&self, event_post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE event_post_id = $1 ORDER BY created_at ASC",
        )
        .bind(event_post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn comment_author_id(&self, comment_id: i64) -> Result<Option<i64>> {
        let author_id: Option<i64> =
            sqlx::query_scalar("SELECT author_id FROM comments WHERE id = $1")
                .bind(comment_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(author_id)
    }

    pub async fn create_club_post(
        &self,
        leader_id: i64,
        title: &str,
        description: &str,
    ) -> Result<ClubPost> {
        let post = sqlx::query_as::<_, ClubPost>(
            "INSERT INTO club_posts (leader_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(leader_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    pub async fn find_club_post(&self, club_post_id: i64) -> Result<Option<ClubPost>> {
        let post = sqlx::query_as::<_, ClubPost>("SELECT * FROM club_posts WHERE id = $1")
            .bind(club_post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    pub async fn list_club_posts(&self, limit: i64, offset: i64) -> Result<Vec<ClubPost>> {
        let posts = sqlx::query_as::<_, ClubPost>(
            "SELECT * FROM club_posts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    pub async fn count_club_posts(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM club_posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn club_leader_id(&self, club_post_id: i64) -> Result<Option<i64>> {
        let leader_id: Option<i64> =
            sqlx::query_scalar("SELECT leader_id FROM club_posts WHERE id = $1")
                .bind(club_post_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(leader_id)
    }
}
