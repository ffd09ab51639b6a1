use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chat::chat_models::{ChatContextType, ChatMessage, ChatRoom};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub context_type: ChatContextType,
    pub context_id: i64,
    pub target_user_id: i64,
}

/// Content rules (trim, non-empty, max length) are enforced by the chat
/// service so the WebSocket path shares them; no derive validation here.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatTargetResponse {
    pub context_type: ChatContextType,
    pub context_id: i64,
    pub target_user_id: i64,
}

/// A room projected to the requesting user's viewpoint: `target_user_id`
/// is the opposite participant and `my_unread_count` the requester's side.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatRoomResponse {
    pub room_id: i64,
    pub context_type: ChatContextType,
    pub context_id: i64,
    pub target_user_id: i64,
    pub target_user_nickname: Option<String>,
    pub target_user_profile_image_url: Option<String>,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub my_unread_count: i32,
}

impl ChatRoomResponse {
    /// Viewpoint projection without the target-user profile lookup.
    pub fn project(room: &ChatRoom, viewer_id: i64) -> Self {
        let target_user_id = room.other_participant(viewer_id);
        Self {
            room_id: room.id,
            context_type: room.context_type,
            context_id: room.context_id,
            target_user_id,
            target_user_nickname: None,
            target_user_profile_image_url: None,
            last_message: room.last_message.clone(),
            last_message_at: room.last_message_at,
            my_unread_count: room.unread_for(viewer_id),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub message_id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            message_id: message.id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetUserQuery {
    pub context_type: ChatContextType,
    pub context_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RoomListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_projection_swaps_viewpoints() {
        let room = ChatRoom {
            id: 42,
            context_type: ChatContextType::EventPost,
            context_id: 10,
            user_a_id: 3,
            user_b_id: 7,
            last_message: Some("hi".to_string()),
            last_message_at: Some(Utc::now()),
            unread_count_a: 1,
            unread_count_b: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let for_a = ChatRoomResponse::project(&room, 3);
        assert_eq!(for_a.target_user_id, 7);
        assert_eq!(for_a.my_unread_count, 1);

        let for_b = ChatRoomResponse::project(&room, 7);
        assert_eq!(for_b.target_user_id, 3);
        assert_eq!(for_b.my_unread_count, 0);
        assert_eq!(for_b.last_message.as_deref(), Some("hi"));
    }
}
