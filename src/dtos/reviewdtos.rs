use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::reviewmodel::ModerationStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewDto {
    pub order_id: Uuid,
    pub target_id: Uuid,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApproveReviewDto {
    #[validate(range(min = -1000, max = 1000))]
    pub bonus_points: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectReviewDto {
    #[validate(length(min = 1, message = "A rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
    pub moderation_status: Option<ModerationStatus>,
}
