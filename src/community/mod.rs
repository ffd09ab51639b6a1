pub mod community_dto;
pub mod community_handlers;
pub mod community_models;
pub mod community_repository;
pub mod community_service;

pub use community_models::{ClubPost, Comment, EventPost};
pub use community_repository::CommunityRepository;
pub use community_service::CommunityService;
