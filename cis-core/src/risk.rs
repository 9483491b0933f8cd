use serde::{Deserialize, Serialize};

/// Risk level assigned to an analyzed change.
///
/// `Unknown` is the sentinel for input that matched no configured pattern;
/// it is a normal outcome, not an error.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// HIGH and CRITICAL changes always require a human in the loop.
    pub fn requires_manual_review(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_upper_case() {
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Unknown).unwrap(), "\"UNKNOWN\"");
        let parsed: RiskLevel = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, RiskLevel::High);
    }

    #[test]
    fn manual_review_only_for_high_and_critical() {
        assert!(!RiskLevel::Low.requires_manual_review());
        assert!(!RiskLevel::Medium.requires_manual_review());
        assert!(RiskLevel::High.requires_manual_review());
        assert!(RiskLevel::Critical.requires_manual_review());
        assert!(!RiskLevel::Unknown.requires_manual_review());
    }
}
