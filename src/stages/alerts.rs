use std::time::Duration;

use anyhow::Result;
use futures::future::{BoxFuture, join_all};
use serde_json::json;
use tracing::{info, warn};

use crate::models::{AlertChannel, AlertOutcome, SosPayload};

/// Successful channel delivery: a summary plus channel-specific records
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub summary: String,
    pub details: Vec<serde_json::Value>,
}

/// One alert fan-out target.
///
/// Senders are isolated: an error from `send` is converted by the
/// dispatcher into a Failed outcome and never propagates.
pub trait AlertSender: Send + Sync {
    fn channel(&self) -> AlertChannel;

    fn send<'a>(&'a self, payload: &'a SosPayload) -> BoxFuture<'a, Result<ChannelReport>>;
}

/// Fan out one SOS payload to every sender concurrently and collect all
/// outcomes. Never fails as a whole; the result always has one entry per
/// sender, in sender order, failures included.
pub async fn dispatch(senders: &[Box<dyn AlertSender>], payload: &SosPayload) -> Vec<AlertOutcome> {
    info!("dispatching SOS alerts across {} channels", senders.len());

    let outcomes = join_all(senders.iter().map(|sender| async move {
        match sender.send(payload).await {
            Ok(report) => {
                info!("alert channel {} delivered: {}", sender.channel(), report.summary);
                AlertOutcome::sent(sender.channel(), report.summary, report.details)
            }
            Err(err) => {
                warn!("alert channel {} failed: {}", sender.channel(), err);
                AlertOutcome::failed(sender.channel(), "Alert delivery failed")
            }
        }
    }))
    .await;

    outcomes
}

/// The three built-in simulated channels, in dispatch order
pub fn default_senders() -> Vec<Box<dyn AlertSender>> {
    vec![
        Box::new(PoliceStationSender),
        Box::new(EmergencyContactSender),
        Box::new(EmergencyServiceSender),
    ]
}

/// Simulated notification of nearby police stations
pub struct PoliceStationSender;

impl AlertSender for PoliceStationSender {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Police
    }

    fn send<'a>(&'a self, _payload: &'a SosPayload) -> BoxFuture<'a, Result<ChannelReport>> {
        Box::pin(async move {
            // simulated network latency
            tokio::time::sleep(Duration::from_millis(1000)).await;

            let stations = vec![
                json!({
                    "name": "NYPD Midtown South Precinct",
                    "distance": "0.5km",
                    "phone": "+1-212-239-9811",
                    "address": "357 W 35th St, New York, NY 10001",
                }),
                json!({
                    "name": "NYPD 13th Precinct",
                    "distance": "1.2km",
                    "phone": "+1-212-477-7411",
                    "address": "230 E 21st St, New York, NY 10010",
                }),
            ];

            Ok(ChannelReport {
                summary: format!("Alerted {} nearby police stations", stations.len()),
                details: stations,
            })
        })
    }
}

/// Simulated SMS fan-out to registered emergency contacts
pub struct EmergencyContactSender;

impl EmergencyContactSender {
    /// Compose the SMS body sent to each contact
    fn message_body(payload: &SosPayload) -> String {
        let address = payload
            .location
            .as_ref()
            .map(|l| l.address.as_str())
            .unwrap_or("Unknown location");
        format!(
            "EMERGENCY SOS ALERT\n\nSOS message detected: \"{}\"\n\nLocation: {}\nTime: {}\n\nPlease respond immediately if you can assist.",
            payload.transcript_text,
            address,
            payload.raised_at.to_rfc3339(),
        )
    }
}

impl AlertSender for EmergencyContactSender {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Contacts
    }

    fn send<'a>(&'a self, payload: &'a SosPayload) -> BoxFuture<'a, Result<ChannelReport>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(800)).await;

            let body = Self::message_body(payload);
            let contacts = vec![
                json!({
                    "name": "Emergency Contact 1",
                    "phone": "+1-555-0123",
                    "relationship": "Family",
                    "message": body,
                }),
                json!({
                    "name": "Emergency Contact 2",
                    "phone": "+1-555-0456",
                    "relationship": "Friend",
                    "message": body,
                }),
            ];

            Ok(ChannelReport {
                summary: format!("SMS alerts sent to {} emergency contacts", contacts.len()),
                details: contacts,
            })
        })
    }
}

/// Simulated notification of ambulance and fire services
pub struct EmergencyServiceSender;

impl AlertSender for EmergencyServiceSender {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Services
    }

    fn send<'a>(&'a self, _payload: &'a SosPayload) -> BoxFuture<'a, Result<ChannelReport>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(1200)).await;

            let services = vec![
                json!({
                    "name": "Ambulance Service",
                    "phone": "911",
                    "status": "Dispatched",
                    "eta": "5-8 minutes",
                }),
                json!({
                    "name": "Fire Department",
                    "phone": "911",
                    "status": "On Standby",
                    "eta": "3-5 minutes",
                }),
            ];

            Ok(ChannelReport {
                summary: "Emergency services notified".to_string(),
                details: services,
            })
        })
    }
}
