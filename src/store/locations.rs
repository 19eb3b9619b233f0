use chrono::{Duration, Utc};

use crate::models::{Location, LocationConfidence};

/// Static lookup of last-known locations keyed by voice-sample identity.
///
/// Entries match case-insensitively as substrings of the sample id, so any
/// enrollment clip belonging to a registered identity resolves. Unknown
/// identities return None; coordinates are never invented.
pub struct LocationRegistry {
    entries: Vec<(String, Location)>,
}

impl LocationRegistry {
    pub fn new(entries: Vec<(String, Location)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(trigger, location)| (trigger.to_lowercase(), location))
            .collect();
        Self { entries }
    }

    /// Registry for the built-in enrollment roster
    pub fn builtin() -> Self {
        Self::new(vec![
            (
                "priyaa".to_string(),
                Location {
                    latitude: 40.7589,
                    longitude: -73.9851,
                    address: "Times Square, New York, NY".to_string(),
                    last_seen_at: Utc::now(),
                    confidence: LocationConfidence::High,
                    radius_meters: Some(500),
                    area: Some("Times Square District".to_string()),
                },
            ),
            (
                "udhay".to_string(),
                Location {
                    latitude: 34.0522,
                    longitude: -118.2437,
                    address: "Downtown Los Angeles, CA".to_string(),
                    last_seen_at: Utc::now() - Duration::hours(2),
                    confidence: LocationConfidence::Medium,
                    radius_meters: Some(1000),
                    area: Some("Downtown LA Area".to_string()),
                },
            ),
        ])
    }

    /// Resolve a sample id to its registered location, if any
    pub fn lookup(&self, sample_id: &str) -> Option<Location> {
        let id = sample_id.to_lowercase();
        self.entries
            .iter()
            .find(|(trigger, _)| id.contains(trigger))
            .map(|(_, location)| location.clone())
    }
}
