use serde::{Deserialize, Serialize};

/// Severity of a detected emergency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl EmergencyLevel {
    /// Level thresholds: >=70 critical, >=50 high, >=30 medium, else low
    pub fn from_confidence(confidence_pct: u8) -> Self {
        match confidence_pct {
            70.. => Self::Critical,
            50.. => Self::High,
            30.. => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Parse a free-text level from the reasoning model, falling back to the
    /// confidence-derived level for anything unrecognized
    pub fn parse(label: &str, confidence_pct: u8) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::from_confidence(confidence_pct),
        }
    }
}

/// Result of classifying a transcript as emergency / not emergency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyAssessment {
    pub is_emergency: bool,
    /// 0-100
    pub confidence_pct: u8,
    pub level: EmergencyLevel,
    pub keywords_found: Vec<String>,
    pub rationale: String,
    pub recommended_action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(EmergencyLevel::from_confidence(100), EmergencyLevel::Critical);
        assert_eq!(EmergencyLevel::from_confidence(70), EmergencyLevel::Critical);
        assert_eq!(EmergencyLevel::from_confidence(69), EmergencyLevel::High);
        assert_eq!(EmergencyLevel::from_confidence(50), EmergencyLevel::High);
        assert_eq!(EmergencyLevel::from_confidence(49), EmergencyLevel::Medium);
        assert_eq!(EmergencyLevel::from_confidence(30), EmergencyLevel::Medium);
        assert_eq!(EmergencyLevel::from_confidence(29), EmergencyLevel::Low);
        assert_eq!(EmergencyLevel::from_confidence(0), EmergencyLevel::Low);
    }

    #[test]
    fn test_level_parse_unrecognized_uses_confidence() {
        assert_eq!(EmergencyLevel::parse("CRITICAL", 0), EmergencyLevel::Critical);
        assert_eq!(EmergencyLevel::parse("severe", 55), EmergencyLevel::High);
        assert_eq!(EmergencyLevel::parse("", 10), EmergencyLevel::Low);
    }
}
