use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    community::{
        community_dto::{
            CreateClubPostRequest, CreateCommentRequest, CreateEventPostRequest, ListQuery,
            PaginatedClubPosts, PaginatedEventPosts,
        },
        community_models::{ClubPost, Comment, EventPost},
    },
    error::Result,
    middleware::AuthUser,
    state::AppState,
};

/// Create an event post
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "community",
    request_body = CreateEventPostRequest,
    responses(
        (status = 201, description = "Event post created", body = EventPost),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_event_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEventPostRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let post = state
        .community_service
        .create_event_post(
            user_id,
            &payload.title,
            &payload.content,
            payload.location.as_deref(),
            payload.event_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// List event posts, newest first
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "community",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u32>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Paginated event posts", body = PaginatedEventPosts),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_event_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let size = query.size.unwrap_or(20);

    let posts = state.community_service.list_event_posts(page, size).await?;

    Ok(Json(posts))
}

/// Get a single event post
#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    tag = "community",
    params(("event_id" = i64, Path, description = "Event post id")),
    responses(
        (status = 200, description = "Event post", body = EventPost),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_event_post(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let post = state.community_service.get_event_post(event_id).await?;

    Ok(Json(post))
}

/// Comment on an event post
#[utoipa::path(
    post,
    path = "/api/events/{event_id}/comments",
    tag = "community",
    params(("event_id" = i64, Path, description = "Event post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(event_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let comment = state
        .community_service
        .create_comment(event_id, user_id, &payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List an event post's comments, oldest first
#[utoipa::path(
    get,
    path = "/api/events/{event_id}/comments",
    tag = "community",
    params(("event_id" = i64, Path, description = "Event post id")),
    responses(
        (status = 200, description = "Comments", body = Vec<Comment>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(event_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let comments = state.community_service.list_comments(event_id).await?;

    Ok(Json(comments))
}

/// Create a club post
#[utoipa::path(
    post,
    path = "/api/clubs",
    tag = "community",
    request_body = CreateClubPostRequest,
    responses(
        (status = 201, description = "Club post created", body = ClubPost),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_club_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateClubPostRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let post = state
        .community_service
        .create_club_post(user_id, &payload.title, &payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// List club posts, newest first
#[utoipa::path(
    get,
    path = "/api/clubs",
    tag = "community",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default: 1)"),
        ("size" = Option<u32>, Query, description = "Items per page (default: 20)")
    ),
    responses(
        (status = 200, description = "Paginated club posts", body = PaginatedClubPosts),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_club_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1);
    let size = query.size.unwrap_or(20);

    let posts = state.community_service.list_club_posts(page, size).await?;

    Ok(Json(posts))
}

/// Get a single club post
#[utoipa::path(
    get,
    path = "/api/clubs/{club_post_id}",
    tag = "community",
    params(("club_post_id" = i64, Path, description = "Club post id")),
    responses(
        (status = 200, description = "Club post", body = ClubPost),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Club post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_club_post(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(club_post_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let post = state.community_service.get_club_post(club_post_id).await?;

    Ok(Json(post))
}
