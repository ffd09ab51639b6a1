use crate::{chat::chat_error::ChatError, chat::ChatService, error::Result};

use super::identity::Principal;

/// Personal queue carrying room-list row refreshes; requires an identity
/// but no room membership.
pub const ROOM_LIST_QUEUE: &str = "/user/queue/rooms.list";

const ROOM_QUEUE_PREFIX: &str = "/user/queue/rooms.";
const ROOM_SEND_PREFIX: &str = "/app/chat/rooms/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeTarget {
    /// Per-room private queue `/user/queue/rooms.{roomId}`.
    Room(i64),
    /// The shared list-refresh queue.
    RoomList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendTarget {
    /// `/app/chat/rooms/{roomId}/messages`
    Message(i64),
    /// `/app/chat/rooms/{roomId}/read`
    Read(i64),
}

/// Full-match parse of a subscribe destination. Anything that is not the
/// list queue or a numeric room queue is unknown.
pub fn parse_subscribe_destination(destination: &str) -> Option<SubscribeTarget> {
    if destination == ROOM_LIST_QUEUE {
        return Some(SubscribeTarget::RoomList);
    }
    let room_id = destination.strip_prefix(ROOM_QUEUE_PREFIX)?.parse().ok()?;
    Some(SubscribeTarget::Room(room_id))
}

/// Full-match parse of a send destination.
pub fn parse_send_destination(destination: &str) -> Option<SendTarget> {
    let rest = destination.strip_prefix(ROOM_SEND_PREFIX)?;
    let (room_id, action) = rest.split_once('/')?;
    let room_id = room_id.parse().ok()?;
    match action {
        "messages" => Some(SendTarget::Message(room_id)),
        "read" => Some(SendTarget::Read(room_id)),
        _ => None,
    }
}

/// Authorizes every inbound subscribe/send frame: an identity must be
/// bound, and room-scoped destinations additionally require the identity
/// to be a participant of the room encoded in the destination.
#[derive(Clone)]
pub struct FrameGate {
    chat_service: ChatService,
}

impl FrameGate {
    pub fn new(chat_service: ChatService) -> Self {
        Self { chat_service }
    }

    pub async fn authorize_subscribe(
        &self,
        principal: Option<Principal>,
        destination: &str,
    ) -> Result<SubscribeTarget> {
        let principal = principal.ok_or(ChatError::WebSocketUnauthorized)?;

        match parse_subscribe_destination(destination) {
            Some(SubscribeTarget::RoomList) => Ok(SubscribeTarget::RoomList),
            Some(SubscribeTarget::Room(room_id)) => {
                if self
                    .chat_service
                    .is_participant(room_id, principal.user_id)
                    .await?
                {
                    Ok(SubscribeTarget::Room(room_id))
                } else {
                    Err(ChatError::SubscriptionForbidden.into())
                }
            }
            None => Err(ChatError::SubscriptionForbidden.into()),
        }
    }

    pub async fn authorize_send(
        &self,
        principal: Option<Principal>,
        destination: &str,
    ) -> Result<SendTarget> {
        let principal = principal.ok_or(ChatError::WebSocketUnauthorized)?;

        let target =
            parse_send_destination(destination).ok_or(ChatError::ForbiddenRoomAccess)?;
        let room_id = match target {
            SendTarget::Message(id) | SendTarget::Read(id) => id,
        };

        if self
            .chat_service
            .is_participant(room_id, principal.user_id)
            .await?
        {
            Ok(target)
        } else {
            Err(ChatError::ForbiddenRoomAccess.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_room_queue() {
        assert_eq!(
            parse_subscribe_destination("/user/queue/rooms.10"),
            Some(SubscribeTarget::Room(10))
        );
        assert_eq!(
            parse_subscribe_destination(ROOM_LIST_QUEUE),
            Some(SubscribeTarget::RoomList)
        );
    }

    #[test]
    fn test_parse_room_queue_rejects_malformed() {
        assert_eq!(parse_subscribe_destination("/user/queue/rooms."), None);
        assert_eq!(parse_subscribe_destination("/user/queue/rooms.abc"), None);
        assert_eq!(parse_subscribe_destination("/user/queue/rooms.10x"), None);
        assert_eq!(parse_subscribe_destination("/user/queue/other"), None);
        assert_eq!(parse_subscribe_destination("/app/chat/rooms/10/messages"), None);
    }

    #[test]
    fn test_parse_send_destination() {
        assert_eq!(
            parse_send_destination("/app/chat/rooms/10/messages"),
            Some(SendTarget::Message(10))
        );
        assert_eq!(
            parse_send_destination("/app/chat/rooms/10/read"),
            Some(SendTarget::Read(10))
        );
    }

    #[test]
    fn test_parse_send_destination_rejects_malformed() {
        assert_eq!(parse_send_destination("/app/chat/rooms/10/delete"), None);
        assert_eq!(parse_send_destination("/app/chat/rooms/abc/messages"), None);
        assert_eq!(parse_send_destination("/app/chat/rooms/10"), None);
        assert_eq!(parse_send_destination("/user/queue/rooms.10"), None);
    }
}
