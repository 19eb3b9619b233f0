use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmergencyAssessment, Location};

/// Alert fan-out target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertChannel {
    Police,
    Contacts,
    Services,
}

impl std::fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Police => "police",
            Self::Contacts => "contacts",
            Self::Services => "services",
        };
        write!(f, "{}", name)
    }
}

/// Delivery status of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Sent,
    Failed,
}

/// Outcome of one alert channel for one dispatch. The dispatcher returns one
/// of these per configured channel, failures included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertOutcome {
    pub channel: AlertChannel,
    pub status: AlertStatus,
    pub summary: String,
    /// Channel-specific records (stations, contacts, service ETAs)
    pub details: Vec<serde_json::Value>,
    pub sent_at: DateTime<Utc>,
}

impl AlertOutcome {
    pub fn sent(channel: AlertChannel, summary: impl Into<String>, details: Vec<serde_json::Value>) -> Self {
        Self {
            channel,
            status: AlertStatus::Sent,
            summary: summary.into(),
            details,
            sent_at: Utc::now(),
        }
    }

    pub fn failed(channel: AlertChannel, summary: impl Into<String>) -> Self {
        Self {
            channel,
            status: AlertStatus::Failed,
            summary: summary.into(),
            details: Vec::new(),
            sent_at: Utc::now(),
        }
    }
}

/// Everything the alert channels need to describe the incident
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosPayload {
    pub transcript_text: String,
    pub assessment: EmergencyAssessment,
    pub location: Option<Location>,
    pub clip_name: String,
    pub raised_at: DateTime<Utc>,
}
