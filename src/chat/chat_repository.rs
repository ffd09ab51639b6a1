use crate::error::Result;
use sqlx::PgPool;

use super::chat_models::{ChatContextType, ChatMessage, ChatRoom};

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Optimistic insert. A concurrent creator loses the race at the
    /// `uk_room_ctx_users` unique key and surfaces a database error the
    /// service layer resolves with a re-select.
    pub async fn insert_room(
        &self,
        context_type: ChatContextType,
        context_id: i64,
        user_a_id: i64,
        user_b_id: i64,
    ) -> Result<ChatRoom> {
        let room = sqlx::query_as::<_, ChatRoom>(
            "INSERT INTO chat_rooms (context_type, context_id, user_a_id, user_b_id, unread_count_a, unread_count_b)
             VALUES ($1, $2, $3, $4, 0, 0)
             RETURNING *",
        )
        .bind(context_type)
        .bind(context_id)
        .bind(user_a_id)
        .bind(user_b_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(room)
    }

    pub async fn find_by_context_and_pair(
        &self,
        context_type: ChatContextType,
        context_id: i64,
        user_a_id: i64,
        user_b_id: i64,
    ) -> Result<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoom>(
            "SELECT * FROM chat_rooms
             WHERE context_type = $1 AND context_id = $2 AND user_a_id = $3 AND user_b_id = $4",
        )
        .bind(context_type)
        .bind(context_id)
        .bind(user_a_id)
        .bind(user_b_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    pub async fn find_by_id(&self, room_id: i64) -> Result<Option<ChatRoom>> {
        let room = sqlx::query_as::<_, ChatRoom>("SELECT * FROM chat_rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(room)
    }

    /// `order_by` / `order_dir` must come from the service-side whitelist.
    pub async fn find_rooms_for_user(
        &self,
        user_id: i64,
        order_by: &str,
        order_dir: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatRoom>> {
        let sql = format!(
            "SELECT * FROM chat_rooms
             WHERE user_a_id = $1 OR user_b_id = $1
             ORDER BY {order_by} {order_dir} NULLS LAST, id DESC
             LIMIT $2 OFFSET $3",
        );

        let rooms = sqlx::query_as::<_, ChatRoom>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rooms)
    }

    pub async fn count_rooms_for_user(&self, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_rooms WHERE user_a_id = $1 OR user_b_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Message insert, room preview cache and the other side's unread
    /// increment form one transaction: either all three land or none do.
    /// `created_at` is assigned by the database.
    pub async fn append_message_and_bump_unread(
        &self,
        room_id: i64,
        sender_id: i64,
        content: &str,
        preview: &str,
    ) -> Result<ChatMessage> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (room_id, sender_id, content)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(room_id)
        .bind(sender_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE chat_rooms
             SET last_message = $1,
                 last_message_at = $2,
                 unread_count_a = unread_count_a + CASE WHEN user_b_id = $3 THEN 1 ELSE 0 END,
                 unread_count_b = unread_count_b + CASE WHEN user_a_id = $3 THEN 1 ELSE 0 END,
                 updated_at = NOW()
             WHERE id = $4",
        )
        .bind(preview)
        .bind(message.created_at)
        .bind(sender_id)
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// Reset the caller's own unread counter. Idempotent.
    pub async fn reset_unread(&self, room_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE chat_rooms
             SET unread_count_a = CASE WHEN user_a_id = $1 THEN 0 ELSE unread_count_a END,
                 unread_count_b = CASE WHEN user_b_id = $1 THEN 0 ELSE unread_count_b END,
                 updated_at = NOW()
             WHERE id = $2",
        )
        .bind(user_id)
        .bind(room_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Oldest first, natural reading order.
    pub async fn find_messages_asc(
        &self,
        room_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChatMessage>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT * FROM chat_messages
             WHERE room_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(room_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn count_messages(&self, room_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE room_id = $1")
                .bind(room_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
