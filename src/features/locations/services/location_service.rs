use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::locations::dtos::CreateLocationDto;
use crate::features::locations::geometry::parse_geometry;
use crate::features::locations::models::{Bounds, RubbishLocation, SearchArea};
use crate::features::locations::stores::{LocationStore, StoreError};

/// Service for creating, fetching and searching rubbish locations
pub struct LocationService {
    store: Arc<dyn LocationStore>,
    timeout: Duration,
}

impl LocationService {
    pub fn new(store: Arc<dyn LocationStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run a store call under the configured timeout
    async fn bounded<T, F>(&self, op: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                tracing::error!("Store call '{}' timed out after {:?}", op, self.timeout);
                Err(AppError::Storage(StoreError::Timeout(self.timeout)))
            }
        }
    }

    /// Persist a new location and return its id
    pub async fn create(&self, dto: CreateLocationDto) -> Result<String> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        parse_geometry(&dto.geojson)
            .map_err(|e| AppError::Validation(format!("geojson: {}", e)))?;

        let entries = dto.log.len();
        let id = self
            .bounded("insert", self.store.insert(dto.geojson, dto.log))
            .await?;

        tracing::info!("Rubbish location created: id={}, log_entries={}", id, entries);

        Ok(id)
    }

    /// Lookup by public id; `None` when no such location exists
    pub async fn get_by_id(&self, id: &str) -> Result<Option<RubbishLocation>> {
        self.bounded("find_by_id", self.store.find_by_id(id)).await
    }

    /// Viewport search.
    ///
    /// `raw_bounds` is mandatory: anything that does not decode to four finite
    /// numbers fails with [`AppError::InvalidBounds`] before the store is
    /// touched. `raw_not_in` is optional and anything malformed counts as an
    /// empty exclusion list.
    pub async fn search(
        &self,
        raw_bounds: Option<&str>,
        raw_not_in: Option<&str>,
    ) -> Result<Vec<RubbishLocation>> {
        let bounds = Bounds::parse(raw_bounds).map_err(|e| {
            tracing::warn!("Rejected location search: {}", e);
            AppError::InvalidBounds(e)
        })?;
        let exclude_ids = parse_exclude_ids(raw_not_in);

        tracing::debug!(
            "Searching locations: bounds={:?}, excluded={}",
            bounds,
            exclude_ids.len()
        );

        let area = SearchArea::from(bounds);
        self.bounded(
            "find_within_bounds",
            self.store.find_within_bounds(&area, &exclude_ids),
        )
        .await
    }
}

/// Decode the exclusion list leniently, dropping duplicate ids
fn parse_exclude_ids(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => {
            let mut seen = HashSet::new();
            ids.into_iter()
                .filter(|id| seen.insert(id.clone()))
                .collect()
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed notIn parameter: {}", e);
            Vec::new()
        }
    }
}
