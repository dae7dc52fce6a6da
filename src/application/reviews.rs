//! Guest review service

use std::sync::Arc;

use log::info;

use crate::domain::{DomainError, DomainResult, Review, ReviewRepository};

pub struct ReviewService {
    store: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewRepository>) -> Self {
        Self { store }
    }

    /// Record a guest review. Rating is a 1-5 star score.
    pub async fn add(&self, name: &str, rating: u8, comment: &str) -> DomainResult<Review> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name is required".to_string()));
        }
        if !(1..=5).contains(&rating) {
            return Err(DomainError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(DomainError::Validation("comment is required".to_string()));
        }

        let review = Review::new(name, rating, comment);
        self.store.save(review.clone()).await?;
        info!("Review {} recorded ({} stars)", review.id, review.rating);
        Ok(review)
    }

    /// All reviews, newest first.
    pub async fn list(&self) -> DomainResult<Vec<Review>> {
        let mut reviews = self.store.find_all().await?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::memory::MemoryStore;

    fn service() -> ReviewService {
        ReviewService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn add_and_list_newest_first() {
        let svc = service();
        let first = svc.add("Ana", 5, "Great food").await.unwrap();
        let second = svc.add("Ben", 4, "Nice view").await.unwrap();

        let listed = svc.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&first.id.as_str()));
        assert!(ids.contains(&second.id.as_str()));
    }

    #[tokio::test]
    async fn rejects_out_of_range_rating_and_blank_fields() {
        let svc = service();
        assert!(matches!(
            svc.add("Ana", 0, "meh").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.add("Ana", 6, "meh").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.add("  ", 3, "meh").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.add("Ana", 3, "   ").await,
            Err(DomainError::Validation(_))
        ));
        assert!(svc.list().await.unwrap().is_empty());
    }
}
