use axum::http::StatusCode;
use thiserror::Error;

/// Chat domain errors with stable codes, so the REST layer and the
/// WebSocket gate can map the same kind to their own representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("You cannot open a chat with yourself")]
    SelfChatNotAllowed,

    #[error("The context owner does not match the requested target user")]
    ContextTargetMismatch,

    #[error("Chat room not found")]
    RoomNotFound,

    #[error("You are not a participant of this chat room")]
    ForbiddenRoomAccess,

    #[error("Message content must not be empty")]
    MessageEmpty,

    #[error("Message content must not exceed 1000 characters")]
    MessageTooLong,

    #[error("Unsupported chat context type")]
    InvalidContextType,

    // Unique-key collision that survived the re-select; should not happen
    // outside of pathological races and is worth reporting.
    #[error("Chat room creation conflicted, please retry")]
    RoomCreateConflict,

    #[error("WebSocket connection has no authenticated identity")]
    WebSocketUnauthorized,

    #[error("Subscription denied: not a participant of this room")]
    SubscriptionForbidden,

    #[error("Event post not found")]
    EventPostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Club post not found")]
    ClubPostNotFound,
}

impl ChatError {
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::SelfChatNotAllowed => "CHAT-400-SELF",
            ChatError::ContextTargetMismatch => "CHAT-400-CONTEXT",
            ChatError::RoomNotFound => "CHAT-404-ROOM",
            ChatError::ForbiddenRoomAccess => "CHAT-403-ROOM",
            ChatError::MessageEmpty => "CHAT-400-MSG-EMPTY",
            ChatError::MessageTooLong => "CHAT-400-MSG-LEN",
            ChatError::InvalidContextType => "CHAT-400-CTX-TYPE",
            ChatError::RoomCreateConflict => "CHAT-409-ROOM",
            ChatError::WebSocketUnauthorized => "CHAT-401-WS",
            ChatError::SubscriptionForbidden => "CHAT-403-SUB",
            ChatError::EventPostNotFound => "EVENT-404-POST",
            ChatError::CommentNotFound => "COMMENT-404",
            ChatError::ClubPostNotFound => "CLUB-404-POST",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::SelfChatNotAllowed
            | ChatError::ContextTargetMismatch
            | ChatError::MessageEmpty
            | ChatError::MessageTooLong
            | ChatError::InvalidContextType => StatusCode::BAD_REQUEST,
            ChatError::WebSocketUnauthorized => StatusCode::UNAUTHORIZED,
            ChatError::ForbiddenRoomAccess | ChatError::SubscriptionForbidden => {
                StatusCode::FORBIDDEN
            }
            ChatError::RoomNotFound
            | ChatError::EventPostNotFound
            | ChatError::CommentNotFound
            | ChatError::ClubPostNotFound => StatusCode::NOT_FOUND,
            ChatError::RoomCreateConflict => StatusCode::CONFLICT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ChatError::SelfChatNotAllowed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ChatError::WebSocketUnauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ChatError::ForbiddenRoomAccess.status(), StatusCode::FORBIDDEN);
        assert_eq!(ChatError::RoomNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ChatError::RoomCreateConflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ChatError::MessageTooLong.code(), "CHAT-400-MSG-LEN");
        assert_eq!(ChatError::SubscriptionForbidden.code(), "CHAT-403-SUB");
    }
}
