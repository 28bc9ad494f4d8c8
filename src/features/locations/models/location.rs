use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::constants::MAX_LOG_DESCRIPTION_LENGTH;

/// One free-text entry in a location's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LogEntry {
    #[validate(length(
        max = MAX_LOG_DESCRIPTION_LENGTH,
        message = "Log description must not exceed 5000 characters"
    ))]
    pub description: String,
}

/// A reported rubbish location as held by the store
#[derive(Debug, Clone, PartialEq)]
pub struct RubbishLocation {
    pub id: String,
    /// GeoJSON Feature or geometry, stored as submitted
    pub geojson: serde_json::Value,
    /// Chronological, possibly empty
    pub log: Vec<LogEntry>,
}
