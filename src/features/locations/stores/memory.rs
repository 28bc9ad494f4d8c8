use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use geo::{Geometry, Relate};
use tokio::sync::RwLock;

use super::{new_location_id, LocationStore, StoreResult};
use crate::features::locations::geometry::parse_geometry;
use crate::features::locations::models::{LogEntry, RubbishLocation, SearchArea};

struct StoredLocation {
    location: RubbishLocation,
    geometry: Geometry<f64>,
}

/// Process-local store that scans every record on search.
///
/// Meant for local development and tests; there is no spatial index.
#[derive(Default)]
pub struct InMemoryLocationStore {
    records: RwLock<HashMap<String, StoredLocation>>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn insert(&self, geojson: serde_json::Value, log: Vec<LogEntry>) -> StoreResult<String> {
        let geometry = parse_geometry(&geojson)?;
        let id = new_location_id();

        let stored = StoredLocation {
            location: RubbishLocation {
                id: id.clone(),
                geojson,
                log,
            },
            geometry,
        };
        self.records.write().await.insert(id.clone(), stored);

        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<RubbishLocation>> {
        Ok(self
            .records
            .read()
            .await
            .get(id)
            .map(|stored| stored.location.clone()))
    }

    async fn find_within_bounds(
        &self,
        area: &SearchArea,
        exclude_ids: &[String],
    ) -> StoreResult<Vec<RubbishLocation>> {
        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let polygon = area.to_polygon();

        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|stored| !excluded.contains(stored.location.id.as_str()))
            .filter(|stored| stored.geometry.relate(&polygon).is_within())
            .map(|stored| stored.location.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::locations::models::Bounds;
    use crate::features::locations::stores::StoreError;
    use crate::shared::test_helpers::{point_feature, sydney_feature};

    fn sydney_area() -> SearchArea {
        SearchArea::from(Bounds {
            north: -33.0,
            south: -35.0,
            east: 152.0,
            west: 150.0,
        })
    }

    #[tokio::test]
    async fn test_insert_then_find_by_id() {
        let store = InMemoryLocationStore::new();
        let log = vec![LogEntry {
            description: "Dumped mattress".to_string(),
        }];

        let id = store.insert(sydney_feature(), log.clone()).await.unwrap();
        assert!(!id.is_empty());

        let found = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.geojson, sydney_feature());
        assert_eq!(found.log, log);
    }

    #[tokio::test]
    async fn test_find_by_unknown_id_is_none() {
        let store = InMemoryLocationStore::new();
        assert!(store.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryLocationStore::new();
        let mut ids = HashSet::new();
        for i in 0..50 {
            let id = store
                .insert(point_feature(150.0 + i as f64 * 0.01, -34.0), vec![])
                .await
                .unwrap();
            ids.insert(id);
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(store.count().await, 50);
    }

    #[tokio::test]
    async fn test_invalid_geometry_is_rejected() {
        let store = InMemoryLocationStore::new();
        let result = store
            .insert(serde_json::json!({ "type": "Feature" }), vec![])
            .await;
        assert!(matches!(result, Err(StoreError::InvalidGeometry(_))));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_within_bounds_excludes_outside_and_known() {
        let store = InMemoryLocationStore::new();
        let a = store.insert(point_feature(151.0, -34.0), vec![]).await.unwrap();
        let b = store.insert(sydney_feature(), vec![]).await.unwrap();
        let _c = store.insert(point_feature(144.9, -37.8), vec![]).await.unwrap();

        let mut all: Vec<String> = store
            .find_within_bounds(&sydney_area(), &[])
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        all.sort();
        let mut expected = vec![a.clone(), b.clone()];
        expected.sort();
        assert_eq!(all, expected);

        let rest = store
            .find_within_bounds(&sydney_area(), &[a])
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, b);
    }

    #[tokio::test]
    async fn test_geometry_crossing_the_edge_is_not_within() {
        let store = InMemoryLocationStore::new();
        let line = serde_json::json!({
            "type": "LineString",
            "coordinates": [[151.0, -34.0], [153.0, -34.0]]
        });
        store.insert(line, vec![]).await.unwrap();

        let found = store.find_within_bounds(&sydney_area(), &[]).await.unwrap();
        assert!(found.is_empty());
    }
}
