use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, FromRow, PgPool};

use super::{new_location_id, LocationStore, StoreError, StoreResult};
use crate::features::locations::geometry::geometry_object;
use crate::features::locations::models::{LogEntry, RubbishLocation, SearchArea};

/// Row shape of `rubbish_locations`; `pk` and `geom` stay inside the database
#[derive(Debug, FromRow)]
struct LocationRow {
    id: String,
    geojson: Json<Value>,
    log: Json<Vec<LogEntry>>,
}

impl From<LocationRow> for RubbishLocation {
    fn from(row: LocationRow) -> Self {
        Self {
            id: row.id,
            geojson: row.geojson.0,
            log: row.log.0,
        }
    }
}

/// PostGIS-backed store. `geom` carries a GiST index used by `ST_Within`.
///
/// `geom` is 2D; altitudes stay only in the stored GeoJSON.
pub struct PgLocationStore {
    pool: PgPool,
}

impl PgLocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationStore for PgLocationStore {
    async fn insert(&self, geojson: Value, log: Vec<LogEntry>) -> StoreResult<String> {
        let geometry = geometry_object(&geojson)?.to_string();
        let id = new_location_id();

        sqlx::query(
            r#"
            INSERT INTO rubbish_locations (id, geojson, log, geom)
            VALUES ($1, $2, $3, ST_SetSRID(ST_Force2D(ST_GeomFromGeoJSON($4)), 4326))
            "#,
        )
        .bind(&id)
        .bind(Json(&geojson))
        .bind(Json(&log))
        .bind(geometry)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert rubbish location: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<RubbishLocation>> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, geojson, log
            FROM rubbish_locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get rubbish location by id: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(row.map(RubbishLocation::from))
    }

    async fn find_within_bounds(
        &self,
        area: &SearchArea,
        exclude_ids: &[String],
    ) -> StoreResult<Vec<RubbishLocation>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, geojson, log
            FROM rubbish_locations
            WHERE ST_Within(geom, ST_SetSRID(ST_GeomFromGeoJSON($1), 4326))
            AND NOT (id = ANY($2))
            "#,
        )
        .bind(area.to_geojson().to_string())
        .bind(exclude_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to search rubbish locations: {:?}", e);
            StoreError::Database(e)
        })?;

        Ok(rows.into_iter().map(RubbishLocation::from).collect())
    }
}
