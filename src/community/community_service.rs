use chrono::{DateTime, Utc};

use crate::community::community_dto::PaginatedResponse;
use crate::error::{AppError, Result};

use super::community_models::{ClubPost, Comment, EventPost};
use super::community_repository::CommunityRepository;

/// Community content: event posts, their comments, and club posts. These
/// are the three places a 1:1 conversation can start from, so this service
/// doubles as the chat module's content-context resolver.
#[derive(Clone)]
pub struct CommunityService {
    repo: CommunityRepository,
}

impl CommunityService {
    pub fn new(repo: CommunityRepository) -> Self {
        Self { repo }
    }

    pub async fn create_event_post(
        &self,
        author_id: i64,
        title: &str,
        content: &str,
        location: Option<&str>,
        event_at: Option<DateTime<Utc>>,
    ) -> Result<EventPost> {
        self.repo
            .create_event_post(author_id, title, content, location, event_at)
            .await
    }

    pub async fn get_event_post(&self, event_id: i64) -> Result<EventPost> {
        self.repo
            .find_event_post(event_id)
            .await?
            .ok_or(AppError::NotFound("Event post not found".to_string()))
    }

    pub async fn list_event_posts(&self, page: u32, size: u32) -> Result<PaginatedResponse<EventPost>> {
        let limit = size as i64;
        let offset = (page.saturating_sub(1) as i64) * limit;

        let posts = self.repo.list_event_posts(limit, offset).await?;
        let total = self.repo.count_event_posts().await?;

        Ok(PaginatedResponse::new(posts, total, page, size))
    }

    pub async fn create_comment(
        &self,
        event_post_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<Comment> {
        // The FK would catch this too, but a clean 404 beats a 500
        self.get_event_post(event_post_id).await?;

        self.repo.create_comment(event_post_id, author_id, content).await
    }

    pub async fn list_comments(&self, event_post_id: i64) -> Result<Vec<Comment>> {
        self.get_event_post(event_post_id).await?;
        self.repo.list_comments(event_post_id).await
    }

    pub async fn create_club_post(
        &self,
        leader_id: i64,
        title: &str,
        description: &str,
    ) -> Result<ClubPost> {
        self.repo.create_club_post(leader_id, title, description).await
    }

    pub async fn get_club_post(&self, club_post_id: i64) -> Result<ClubPost> {
        self.repo
            .find_club_post(club_post_id)
            .await?
            .ok_or(AppError::NotFound("Club post not found".to_string()))
    }

    pub async fn list_club_posts(&self, page: u32, size: u32) -> Result<PaginatedResponse<ClubPost>> {
        let limit = size as i64;
        let offset = (page.saturating_sub(1) as i64) * limit;

        let posts = self.repo.list_club_posts(limit, offset).await?;
        let total = self.repo.count_club_posts().await?;

        Ok(PaginatedResponse::new(posts, total, page, size))
    }

    // Context-owner resolvers used by the chat service

    pub async fn event_author_id(&self, event_id: i64) -> Result<Option<i64>> {
        self.repo.event_author_id(event_id).await
    }

    pub async fn comment_author_id(&self, comment_id: i64) -> Result<Option<i64>> {
        self.repo.comment_author_id(comment_id).await
    }

    pub async fn club_leader_id(&self, club_post_id: i64) -> Result<Option<i64>> {
        self.repo.club_leader_id(club_post_id).await
    }
}
