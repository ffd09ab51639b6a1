use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::chat::chat_dto::{ChatMessageResponse, ChatRoomResponse};

// Client-to-server frames
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Bind an identity to the connection when the handshake carried no
    /// usable credential.
    Connect {
        token: String,
    },
    Subscribe {
        destination: String,
    },
    Unsubscribe {
        destination: String,
    },
    Send {
        destination: String,
        content: Option<String>,
    },
    Ping,
}

// Server-to-client frames
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Connected {
        user_id: i64,
    },
    Subscribed {
        destination: String,
    },
    Message {
        destination: String,
        payload: ChatMessageResponse,
    },
    Room {
        destination: String,
        payload: ChatRoomResponse,
    },
    Error {
        code: String,
        message: String,
    },
    Ping,
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_client_frame_wire_format() {
        let frame: ClientFrame = serde_json::from_str(
            r#"{"type":"send","destination":"/app/chat/rooms/10/messages","content":"hi"}"#,
        )
        .unwrap();
        match frame {
            ClientFrame::Send {
                destination,
                content,
            } => {
                assert_eq!(destination, "/app/chat/rooms/10/messages");
                assert_eq!(content.as_deref(), Some("hi"));
            }
            other => panic!("unexpected frame: {:?}", other),
        }

        assert!(matches!(
            serde_json::from_str::<ClientFrame>(r#"{"type":"ping"}"#).unwrap(),
            ClientFrame::Ping
        ));
    }

    #[test]
    fn test_message_frame_payload_shape() {
        let frame = ServerFrame::Message {
            destination: "/user/queue/rooms.10".to_string(),
            payload: ChatMessageResponse {
                message_id: 1,
                room_id: 10,
                sender_id: 3,
                content: "hi".to_string(),
                created_at: Utc::now(),
            },
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["payload"]["message_id"], 1);
        assert_eq!(json["payload"]["room_id"], 10);
        assert_eq!(json["payload"]["sender_id"], 3);
        assert_eq!(json["payload"]["content"], "hi");
        assert!(json["payload"]["created_at"].is_string());
    }
}
