use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::locations::models::{LogEntry, RubbishLocation};

/// Request DTO for reporting a rubbish location
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLocationDto {
    /// GeoJSON Feature (or bare geometry) drawn on the map
    #[schema(value_type = Object)]
    pub geojson: serde_json::Value,

    /// Initial log entries; missing or null means none
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(nested)]
    pub log: Vec<LogEntry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<LogEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<LogEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response DTO after a location is created
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedLocationDto {
    pub id: String,
}

/// Response DTO for a rubbish location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationResponseDto {
    pub id: String,
    #[schema(value_type = Object)]
    pub geojson: serde_json::Value,
    pub log: Vec<LogEntry>,
}

impl From<RubbishLocation> for LocationResponseDto {
    fn from(l: RubbishLocation) -> Self {
        Self {
            id: l.id,
            geojson: l.geojson,
            log: l.log,
        }
    }
}

/// Query parameters for the viewport search.
///
/// Both values are JSON documents carried in the query string and are
/// decoded by the service, not by the extractor.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchLocationsQuery {
    /// JSON object `{"north":..,"south":..,"east":..,"west":..}`
    pub bounds: Option<String>,

    /// JSON array of location ids the client already has
    #[serde(rename = "notIn")]
    pub not_in: Option<String>,
}
