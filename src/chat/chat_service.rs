use crate::community::community_service::CommunityService;
use crate::community::community_dto::PaginatedResponse;
use crate::error::{AppError, Result};
use crate::user::user_repository::UserRepository;

use super::chat_dto::{ChatMessageResponse, ChatRoomResponse};
use super::chat_error::ChatError;
use super::chat_models::{normalize_pair, ChatContextType, ChatRoom};
use super::chat_repository::ChatRepository;

const MAX_MESSAGE_CHARS: usize = 1000;
const PREVIEW_CHARS: usize = 300;

const ROOM_SORT_KEYS: &[&str] = &["last_message_at", "created_at"];

/// Business rules for 1:1 rooms and messages. The repository is the only
/// shared mutable resource; room-creation races are resolved by the DB
/// unique key, not by in-process locking.
#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    user_repo: UserRepository,
    community: CommunityService,
}

impl ChatService {
    pub fn new(repo: ChatRepository, user_repo: UserRepository, community: CommunityService) -> Self {
        Self {
            repo,
            user_repo,
            community,
        }
    }

    /// Owner of the content item a conversation starts from.
    pub async fn resolve_target_user_id(
        &self,
        context_type: ChatContextType,
        context_id: i64,
    ) -> Result<i64> {
        let owner = match context_type {
            ChatContextType::EventPost => self
                .community
                .event_author_id(context_id)
                .await?
                .ok_or(ChatError::EventPostNotFound)?,
            ChatContextType::Comment => self
                .community
                .comment_author_id(context_id)
                .await?
                .ok_or(ChatError::CommentNotFound)?,
            ChatContextType::ClubPost => self
                .community
                .club_leader_id(context_id)
                .await?
                .ok_or(ChatError::ClubPostNotFound)?,
        };

        Ok(owner)
    }

    /// Open-or-get: at most one room ever materializes per (context, pair),
    /// even under concurrent callers. Lookup first; on miss, optimistic
    /// insert; if the insert loses the unique-key race, re-select. Only a
    /// failed re-select is a hard conflict.
    pub async fn open_room(
        &self,
        context_type: ChatContextType,
        context_id: i64,
        target_user_id: i64,
        caller_user_id: i64,
    ) -> Result<ChatRoomResponse> {
        if caller_user_id == target_user_id {
            return Err(ChatError::SelfChatNotAllowed.into());
        }

        let expected_owner = self.resolve_target_user_id(context_type, context_id).await?;
        if expected_owner != target_user_id {
            return Err(ChatError::ContextTargetMismatch.into());
        }

        let (user_a_id, user_b_id) = normalize_pair(caller_user_id, target_user_id);

        let room = match self
            .repo
            .find_by_context_and_pair(context_type, context_id, user_a_id, user_b_id)
            .await?
        {
            Some(room) => room,
            None => match self
                .repo
                .insert_room(context_type, context_id, user_a_id, user_b_id)
                .await
            {
                Ok(room) => room,
                Err(AppError::Database(err)) if is_unique_violation(&err) => {
                    tracing::debug!(
                        context_id,
                        user_a_id,
                        user_b_id,
                        "room insert lost creation race, re-selecting"
                    );
                    self.repo
                        .find_by_context_and_pair(context_type, context_id, user_a_id, user_b_id)
                        .await?
                        .ok_or(ChatError::RoomCreateConflict)?
                }
                Err(err) => return Err(err),
            },
        };

        self.to_room_response(&room, caller_user_id).await
    }

    pub async fn list_rooms(
        &self,
        caller_user_id: i64,
        page: u32,
        size: u32,
        sort_by: Option<&str>,
        sort_dir: Option<&str>,
    ) -> Result<PaginatedResponse<ChatRoomResponse>> {
        let order_by = sort_by
            .filter(|key| ROOM_SORT_KEYS.contains(key))
            .unwrap_or("last_message_at");
        let order_dir = match sort_dir {
            Some(dir) if dir.eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        let limit = size as i64;
        let offset = (page.saturating_sub(1) as i64) * limit;

        let rooms = self
            .repo
            .find_rooms_for_user(caller_user_id, order_by, order_dir, limit, offset)
            .await?;
        let total = self.repo.count_rooms_for_user(caller_user_id).await?;

        let mut data = Vec::with_capacity(rooms.len());
        for room in &rooms {
            data.push(self.to_room_response(room, caller_user_id).await?);
        }

        Ok(PaginatedResponse::new(data, total, page, size))
    }

    /// Paged messages, oldest first. Opening the page marks the room read
    /// for the caller: their unread counter resets before the fetch.
    pub async fn get_messages(
        &self,
        room_id: i64,
        caller_user_id: i64,
        page: u32,
        size: u32,
    ) -> Result<PaginatedResponse<ChatMessageResponse>> {
        self.require_participant(room_id, caller_user_id).await?;

        self.repo.reset_unread(room_id, caller_user_id).await?;

        let limit = size as i64;
        let offset = (page.saturating_sub(1) as i64) * limit;

        let messages = self.repo.find_messages_asc(room_id, limit, offset).await?;
        let total = self.repo.count_messages(room_id).await?;

        let data = messages.into_iter().map(ChatMessageResponse::from).collect();
        Ok(PaginatedResponse::new(data, total, page, size))
    }

    /// Persist a message and update the room in one transaction: preview
    /// cache, timestamp, and the other side's unread counter.
    pub async fn send_message(
        &self,
        room_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<ChatMessageResponse> {
        self.require_participant(room_id, sender_id).await?;

        let content = normalize_content(content)?;
        let preview = preview_of(&content);

        let message = self
            .repo
            .append_message_and_bump_unread(room_id, sender_id, &content, &preview)
            .await?;

        Ok(ChatMessageResponse::from(message))
    }

    /// Reset the caller's unread counter. Repeated calls are no-ops.
    pub async fn mark_as_read(&self, room_id: i64, user_id: i64) -> Result<()> {
        self.require_participant(room_id, user_id).await?;
        self.repo.reset_unread(room_id, user_id).await
    }

    pub async fn get_other_participant_id(&self, room_id: i64, user_id: i64) -> Result<i64> {
        let room = self.require_participant(room_id, user_id).await?;
        Ok(room.other_participant(user_id))
    }

    /// Single-room view from `user_id`'s viewpoint; used to refresh list
    /// rows after a send or read.
    pub async fn get_room_row_for(&self, room_id: i64, user_id: i64) -> Result<ChatRoomResponse> {
        let room = self.require_participant(room_id, user_id).await?;
        self.to_room_response(&room, user_id).await
    }

    /// Membership probe for the frame gate. A missing room counts as
    /// non-membership rather than an error.
    pub async fn is_participant(&self, room_id: i64, user_id: i64) -> Result<bool> {
        Ok(self
            .repo
            .find_by_id(room_id)
            .await?
            .map(|room| room.has_participant(user_id))
            .unwrap_or(false))
    }

    async fn require_participant(&self, room_id: i64, user_id: i64) -> Result<ChatRoom> {
        let room = self
            .repo
            .find_by_id(room_id)
            .await?
            .ok_or(ChatError::RoomNotFound)?;

        if !room.has_participant(user_id) {
            return Err(ChatError::ForbiddenRoomAccess.into());
        }

        Ok(room)
    }

    async fn to_room_response(&self, room: &ChatRoom, viewer_id: i64) -> Result<ChatRoomResponse> {
        let mut view = ChatRoomResponse::project(room, viewer_id);

        if let Some(target) = self.user_repo.find_by_id(view.target_user_id).await? {
            view.target_user_nickname = Some(target.nickname);
            view.target_user_profile_image_url = target.profile_image_url;
        }

        Ok(view)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Trim and bound message content. Shared by the REST and WebSocket paths.
fn normalize_content(raw: &str) -> std::result::Result<String, ChatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::MessageEmpty);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::MessageTooLong);
    }
    Ok(trimmed.to_string())
}

/// Bounded copy of the content for the room's list-preview cache.
fn preview_of(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_content_trims() {
        assert_eq!(normalize_content("  hi  ").unwrap(), "hi");
    }

    #[test]
    fn test_normalize_content_rejects_blank() {
        assert_eq!(normalize_content("   \n\t ").unwrap_err(), ChatError::MessageEmpty);
        assert_eq!(normalize_content("").unwrap_err(), ChatError::MessageEmpty);
    }

    #[test]
    fn test_normalize_content_limit_is_post_trim() {
        let exactly_limit = "a".repeat(1000);
        let padded = format!("  {exactly_limit}  ");
        assert_eq!(normalize_content(&padded).unwrap().len(), 1000);

        let over_limit = "a".repeat(1001);
        assert_eq!(
            normalize_content(&over_limit).unwrap_err(),
            ChatError::MessageTooLong
        );
    }

    #[test]
    fn test_normalize_content_counts_chars_not_bytes() {
        let multibyte = "안".repeat(1000);
        assert!(normalize_content(&multibyte).is_ok());
    }

    #[test]
    fn test_preview_is_bounded() {
        let long = "b".repeat(500);
        assert_eq!(preview_of(&long).chars().count(), 300);
        assert_eq!(preview_of("short"), "short");
    }
}
