//! Persistence for rubbish locations.
//!
//! [`LocationStore`] is the seam between the service and the backing store.
//! The service holds an `Arc<dyn LocationStore>` built once at startup.

mod memory;
mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::locations::geometry::GeometryError;
use crate::features::locations::models::{LogEntry, RubbishLocation, SearchArea};

pub use memory::InMemoryLocationStore;
pub use postgres::PgLocationStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store call exceeded {0:?}")]
    Timeout(Duration),

    #[error("store rejected geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Persist a new location and return its freshly generated id
    async fn insert(&self, geojson: serde_json::Value, log: Vec<LogEntry>) -> StoreResult<String>;

    /// Exact lookup; absence is `Ok(None)`
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<RubbishLocation>>;

    /// Locations lying within `area` whose id is not in `exclude_ids`.
    /// Order is unspecified.
    async fn find_within_bounds(
        &self,
        area: &SearchArea,
        exclude_ids: &[String],
    ) -> StoreResult<Vec<RubbishLocation>>;
}

/// Random, non-sequential public identifier
pub fn new_location_id() -> String {
    Uuid::new_v4().to_string()
}
