//! Guest review entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A guest review of the venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Unique review ID (UUID)
    pub id: String,
    /// Reviewer name
    pub name: String,
    /// Star rating, 1..=5
    pub rating: u8,
    /// Free-form comment
    pub comment: String,
    /// When the review was posted
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(name: impl Into<String>, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            rating,
            comment: comment.into(),
            created_at: Utc::now(),
        }
    }
}
