//! In-memory storage implementation

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationRepository, Review, ReviewRepository,
};

/// In-memory storage for development and testing
pub struct MemoryStore {
    reservations: DashMap<String, Reservation>,
    reviews: DashMap<String, Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            reservations: DashMap::new(),
            reviews: DashMap::new(),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn save(&self, reservation: Reservation) -> DomainResult<()> {
        self.reservations.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(id).map(|r| r.clone()))
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        if !self.reservations.contains_key(&reservation.id) {
            return Err(DomainError::NotFound(reservation.id));
        }
        self.reservations.insert(reservation.id.clone(), reservation);
        Ok(())
    }

    async fn find_by_date(&self, date: chrono::NaiveDate) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.date == date)
            .map(|r| r.clone())
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        Ok(self.reservations.iter().map(|r| r.clone()).collect())
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn save(&self, review: Review) -> DomainResult<()> {
        self.reviews.insert(review.id.clone(), review);
        Ok(())
    }

    async fn find_all(&self) -> DomainResult<Vec<Review>> {
        Ok(self.reviews.iter().map(|r| r.clone()).collect())
    }
}
