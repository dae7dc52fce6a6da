//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Save a new review
    async fn save(&self, review: Review) -> DomainResult<()>;

    /// Find all reviews (unordered; callers sort for display)
    async fn find_all(&self) -> DomainResult<Vec<Review>>;
}
