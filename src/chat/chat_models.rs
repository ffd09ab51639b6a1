use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Where a 1:1 conversation originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatContextType {
    EventPost,
    Comment,
    ClubPost,
}

impl std::fmt::Display for ChatContextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatContextType::EventPost => write!(f, "EVENT_POST"),
            ChatContextType::Comment => write!(f, "COMMENT"),
            ChatContextType::ClubPost => write!(f, "CLUB_POST"),
        }
    }
}

/// A 1:1 chat room. The participant pair is canonical: `user_a_id` always
/// holds the smaller id, `user_b_id` the larger, so one (context, pair)
/// tuple maps to at most one row under the DB unique key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatRoom {
    pub id: i64,
    pub context_type: ChatContextType,
    pub context_id: i64,
    pub user_a_id: i64,
    pub user_b_id: i64,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub unread_count_a: i32,
    pub unread_count_b: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatRoom {
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }

    /// The participant slot that is not `user_id`. Callers must have
    /// verified participation first.
    pub fn other_participant(&self, user_id: i64) -> i64 {
        if self.user_a_id == user_id {
            self.user_b_id
        } else {
            self.user_a_id
        }
    }

    /// Unread count from `user_id`'s point of view.
    pub fn unread_for(&self, user_id: i64) -> i32 {
        if self.user_a_id == user_id {
            self.unread_count_a
        } else {
            self.unread_count_b
        }
    }
}

/// Normalize a pair of user ids to canonical (smaller, larger) order.
pub fn normalize_pair(user1: i64, user2: i64) -> (i64, i64) {
    (user1.min(user2), user1.max(user2))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(user_a_id: i64, user_b_id: i64, unread_a: i32, unread_b: i32) -> ChatRoom {
        ChatRoom {
            id: 1,
            context_type: ChatContextType::EventPost,
            context_id: 10,
            user_a_id,
            user_b_id,
            last_message: None,
            last_message_at: None,
            unread_count_a: unread_a,
            unread_count_b: unread_b,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_pair_is_order_independent() {
        assert_eq!(normalize_pair(3, 7), (3, 7));
        assert_eq!(normalize_pair(7, 3), (3, 7));
    }

    #[test]
    fn test_has_participant() {
        let r = room(3, 7, 0, 0);
        assert!(r.has_participant(3));
        assert!(r.has_participant(7));
        assert!(!r.has_participant(8));
    }

    #[test]
    fn test_other_participant() {
        let r = room(3, 7, 0, 0);
        assert_eq!(r.other_participant(3), 7);
        assert_eq!(r.other_participant(7), 3);
    }

    #[test]
    fn test_unread_for_each_side() {
        let r = room(3, 7, 2, 5);
        assert_eq!(r.unread_for(3), 2);
        assert_eq!(r.unread_for(7), 5);
    }

    #[test]
    fn test_context_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&ChatContextType::EventPost).unwrap(),
            "\"EVENT_POST\""
        );
        assert_eq!(
            serde_json::from_str::<ChatContextType>("\"CLUB_POST\"").unwrap(),
            ChatContextType::ClubPost
        );
    }
}
