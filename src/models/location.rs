use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much trust to place in a last-known location record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationConfidence {
    High,
    Medium,
    Low,
}

/// Last-known location of an enrolled identity, from the static registry.
///
/// Absence of a record is expressed as `Option<Location>::None` at every use
/// site; coordinates are never fabricated for unknown identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub last_seen_at: DateTime<Utc>,
    pub confidence: LocationConfidence,
    /// Approximate area radius around the coordinates, when known
    pub radius_meters: Option<u32>,
    /// Human-readable area name, when known
    pub area: Option<String>,
}
