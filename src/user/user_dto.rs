use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 50))]
    pub nickname: Option<String>,
    #[validate(length(max = 500))]
    pub profile_image_url: Option<String>,
}
