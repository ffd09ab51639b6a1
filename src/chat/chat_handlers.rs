use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    chat::{
        chat_dto::{
            ChatMessageResponse, ChatRoomResponse, ChatTargetResponse, CreateRoomRequest,
            MessageListQuery, RoomListQuery, SendMessageRequest, TargetUserQuery,
        },
        chat_models::ChatContextType,
    },
    community::community_dto::{PaginatedMessages, PaginatedRooms},
    error::Result,
    middleware::AuthUser,
    state::AppState,
};

/// Owner lookup for a context item, for clients that only hold content ids
#[utoipa::path(
    get,
    path = "/api/chats/target-user",
    tag = "chats",
    params(
        ("context_type" = ChatContextType, Query, description = "Origin of the conversation"),
        ("context_id" = i64, Query, description = "Content item id")
    ),
    responses(
        (status = 200, description = "Owning user id for the context item", body = ChatTargetResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Context item not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_target_user(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<TargetUserQuery>,
) -> Result<impl IntoResponse> {
    let target_user_id = state
        .chat_service
        .resolve_target_user_id(query.context_type, query.context_id)
        .await?;

    Ok(Json(ChatTargetResponse {
        context_type: query.context_type,
        context_id: query.context_id,
        target_user_id,
    }))
}

/// Open or get the 1:1 room for a context and target user (idempotent)
#[utoipa::path(
    post,
    path = "/api/chats/rooms",
    tag = "chats",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Existing or newly created room", body = ChatRoomResponse),
        (status = 400, description = "Self chat or context/target mismatch"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Context item not found"),
        (status = 409, description = "Room creation conflict")
    ),
    security(("bearer_auth" = []))
)]
pub async fn open_room(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse> {
    let room = state
        .chat_service
        .open_room(
            payload.context_type,
            payload.context_id,
            payload.target_user_id,
            user_id,
        )
        .await?;

    Ok(Json(room))
}

/// Start a chat with an event post's author from the event id alone
#[utoipa::path(
    post,
    path = "/api/chats/events/{event_id}/rooms",
    tag = "chats",
    params(("event_id" = i64, Path, description = "Event post id")),
    responses(
        (status = 200, description = "Existing or newly created room", body = ChatRoomResponse),
        (status = 400, description = "Self chat"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn open_room_with_event_author(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let target_user_id = state
        .chat_service
        .resolve_target_user_id(ChatContextType::EventPost, event_id)
        .await?;

    let room = state
        .chat_service
        .open_room(ChatContextType::EventPost, event_id, target_user_id, user_id)
        .await?;

    Ok(Json(room))
}

/// Start a chat with a comment's author from the comment id alone
#[utoipa::path(
    post,
    path = "/api/chats/comments/{comment_id}/rooms",
    tag = "chats",
    params(("comment_id" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Existing or newly created room", body = ChatRoomResponse),
        (status = 400, description = "Self chat"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Comment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn open_room_with_comment_author(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let target_user_id = state
        .chat_service
        .resolve_target_user_id(ChatContextType::Comment, comment_id)
        .await?;

    let room = state
        .chat_service
        .open_room(ChatContextType::Comment, comment_id, target_user_id, user_id)
        .await?;

    Ok(Json(room))
}

/// Start a chat with a club post's leader from the club post id alone
#[utoipa::path(
    post,
    path = "/api/chats/clubs/{club_post_id}/rooms",
    tag = "chats",
    params(("club_post_id" = i64, Path, description = "Club post id")),
    responses(
        (status = 200, description = "Existing or newly created room", body = ChatRoomResponse),
        (status = 400, description = "Self chat"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Club post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn open_room_with_club_leader(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(club_post_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let target_user_id = state
        .chat_service
        .resolve_target_user_id(ChatContextType::ClubPost, club_post_id)
        .await?;

    let room = state
        .chat_service
        .open_room(ChatContextType::ClubPost, club_post_id, target_user_id, user_id)
        .await?;

    Ok(Json(room))
}

/// The caller's rooms, most recent conversation first by default
#[utoipa::path(
    get,
    path = "/api/chats/rooms",
    tag = "chats",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u32>, Query, description = "Items per page (default: 20)"),
        ("sort_by" = Option<String>, Query, description = "last_message_at (default) or created_at"),
        ("sort_dir" = Option<String>, Query, description = "asc or desc (default: desc)")
    ),
    responses(
        (status = 200, description = "Paginated room list", body = PaginatedRooms),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<RoomListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let size = query.size.unwrap_or(20);

    let rooms = state
        .chat_service
        .list_rooms(
            user_id,
            page,
            size,
            query.sort_by.as_deref(),
            query.sort_dir.as_deref(),
        )
        .await?;

    Ok(Json(rooms))
}

/// Room messages in ascending time order; resets the caller's unread count
#[utoipa::path(
    get,
    path = "/api/chats/rooms/{room_id}/messages",
    tag = "chats",
    params(
        ("room_id" = i64, Path, description = "Chat room id"),
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u32>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Paginated messages, oldest first", body = PaginatedMessages),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Room not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<i64>,
    Query(query): Query<MessageListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let size = query.size.unwrap_or(20);

    let messages = state
        .chat_service
        .get_messages(room_id, user_id, page, size)
        .await?;

    Ok(Json(messages))
}

/// Send a text message over REST. Mainly for tooling and tests; production
/// clients should prefer the WebSocket path, which also fans the message out.
#[utoipa::path(
    post,
    path = "/api/chats/rooms/{room_id}/messages",
    tag = "chats",
    params(("room_id" = i64, Path, description = "Chat room id")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message persisted", body = ChatMessageResponse),
        (status = 400, description = "Empty or over-length content"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Room not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(room_id): Path<i64>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state
        .chat_service
        .send_message(room_id, user_id, &payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}
