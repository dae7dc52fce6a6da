//! Flat-file JSON storage implementation
//!
//! Persists the full dataset to one JSON document and rewrites it on every
//! mutation. Suited to a single-venue dataset; reads are served from the
//! in-memory copy loaded at startup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::{
    DomainError, DomainResult, Reservation, ReservationRepository, Review, ReviewRepository,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    reservations: Vec<Reservation>,
    reviews: Vec<Review>,
}

/// Whole-file JSON store. All mutations hold the state lock across the
/// in-memory change and the file rewrite, so the file never interleaves
/// writes from concurrent requests.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<DataFile>,
}

impl JsonFileStore {
    /// Open the store, loading existing data if the file is present.
    pub fn open(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                DomainError::Storage(format!("corrupt data file {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DataFile::default(),
            Err(e) => {
                return Err(DomainError::Storage(format!(
                    "cannot read data file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        info!(
            "JSON store opened at {} ({} reservations, {} reviews)",
            path.display(),
            state.reservations.len(),
            state.reviews.len()
        );
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Rewrite the data file. Serialization happens inline; the filesystem
    /// write runs on the blocking pool so it cannot stall the runtime.
    async fn persist(&self, state: &DataFile) -> DomainResult<()> {
        let raw = serde_json::to_string_pretty(state)
            .map_err(|e| DomainError::Storage(format!("serialize data file: {}", e)))?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_file(&path, &raw))
            .await
            .map_err(|e| DomainError::Storage(format!("storage task failed: {}", e)))??;
        debug!("JSON store flushed to {}", self.path.display());
        Ok(())
    }
}

fn write_file(path: &Path, raw: &str) -> DomainResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DomainError::Storage(format!("cannot create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, raw)
        .map_err(|e| DomainError::Storage(format!("cannot write {}: {}", path.display(), e)))
}

#[async_trait]
impl ReservationRepository for JsonFileStore {
    async fn save(&self, reservation: Reservation) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.reservations.push(reservation);
        self.persist(&state).await
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let state = self.state.lock().await;
        Ok(state.reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn update(&self, reservation: Reservation) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        let slot = state
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
            .ok_or_else(|| DomainError::NotFound(reservation.id.clone()))?;
        *slot = reservation;
        self.persist(&state).await
    }

    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Vec<Reservation>> {
        let state = self.state.lock().await;
        Ok(state
            .reservations
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let state = self.state.lock().await;
        Ok(state.reservations.clone())
    }
}

#[async_trait]
impl ReviewRepository for JsonFileStore {
    async fn save(&self, review: Review) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.reviews.push(review);
        self.persist(&state).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Review>> {
        let state = self.state.lock().await;
        Ok(state.reviews.clone())
    }
}
