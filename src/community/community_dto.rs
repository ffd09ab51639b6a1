use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::chat::chat_dto::{ChatMessageResponse, ChatRoomResponse};
use crate::community::community_models::{ClubPost, EventPost};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEventPostRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub event_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClubPostRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[aliases(
    PaginatedEventPosts = PaginatedResponse<EventPost>,
    PaginatedClubPosts = PaginatedResponse<ClubPost>,
    PaginatedRooms = PaginatedResponse<ChatRoomResponse>,
    PaginatedMessages = PaginatedResponse<ChatMessageResponse>
)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 41, 1, 20);
        assert_eq!(page.total_pages, 3);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 40, 1, 20);
        assert_eq!(page.total_pages, 2);

        let page: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 20);
        assert_eq!(page.total_pages, 0);
    }
}
