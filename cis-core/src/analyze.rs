//! The simulator facade: risk analysis plus the host-facing operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::approval::{self, ApprovalChain, ReviewTask};
use crate::classify::{KnowledgeHit, match_pattern, search_knowledge};
use crate::deploy::{
    DeploymentConfig, StageValidationResult, ValidationResult, validate_deployment_config,
    validate_pipeline_stage,
};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::risk::RiskLevel;
use crate::store::RuleStore;

/// Structured result of analyzing one change description.
///
/// Deserialization is deliberately lenient: records handed back by a host
/// (for review-task or approval-chain creation) may omit fields, in which
/// case the risk level degrades to UNKNOWN rather than rejecting the call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisRecord {
    pub timestamp: String,
    pub change_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub impact: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safe_conditions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safeguards: Vec<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub risk_definition: Map<String, Value>,
    pub requires_manual_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Summary row for `list_supported_changes`.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedChange {
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub example: String,
}

/// The advisory core. Owns the immutable rule store and the
/// process-lifetime metrics; passed explicitly to the host, never a
/// global.
#[derive(Debug)]
pub struct Simulator {
    rules: Arc<RuleStore>,
    metrics: MetricsCollector,
}

impl Simulator {
    pub fn new(rules: Arc<RuleStore>) -> Self {
        Self { rules, metrics: MetricsCollector::new() }
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    /// Search the knowledge base.
    pub fn search(&self, query: &str) -> Vec<KnowledgeHit> {
        search_knowledge(query, &self.rules.knowledge)
    }

    /// Classify a change description and derive its risk. Every analysis,
    /// including unrecognized ones, is recorded into the metrics.
    pub fn analyze(&self, change_description: &str) -> AnalysisRecord {
        let record = match match_pattern(change_description, &self.rules.patterns) {
            None => AnalysisRecord {
                timestamp: Utc::now().to_rfc3339(),
                change_description: change_description.to_string(),
                risk_level: RiskLevel::Unknown,
                message: Some("Unrecognized change pattern".to_string()),
                recommendation: Some("Manual review required".to_string()),
                ..AnalysisRecord::default()
            },
            Some((name, pattern)) => {
                let risk_level = pattern.risk_level;
                debug!(pattern = name, risk = %risk_level, "change pattern matched");
                AnalysisRecord {
                    timestamp: Utc::now().to_rfc3339(),
                    change_description: change_description.to_string(),
                    matched_pattern: Some(name.to_string()),
                    risk_level,
                    impact: pattern.impacts.clone(),
                    safe_conditions: pattern.safe_conditions.clone(),
                    safeguards: pattern.safeguards.clone(),
                    risk_definition: self.rules.risk_definition(risk_level),
                    requires_manual_review: risk_level.requires_manual_review(),
                    message: None,
                    recommendation: None,
                }
            }
        };
        self.metrics.record(&record);
        record
    }

    /// Advisory review task for a previously produced analysis. Pure.
    pub fn create_review_task(&self, record: &AnalysisRecord) -> ReviewTask {
        approval::create_review_task(record)
    }

    /// Policy-based approval chain for a previously produced analysis.
    pub fn create_approval_workflow(&self, record: &AnalysisRecord) -> ApprovalChain {
        approval::create_approval_chain(&self.rules.approval_stages, record)
    }

    /// All configured change patterns, in match-priority order.
    pub fn list_supported_changes(&self) -> Vec<SupportedChange> {
        self.rules
            .patterns
            .iter()
            .map(|(name, pattern)| SupportedChange {
                name: name.clone(),
                description: pattern.description.clone(),
                risk_level: pattern.risk_level,
                example: pattern.example.clone(),
            })
            .collect()
    }

    pub fn statistics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn validate_deployment_config(&self, config: &DeploymentConfig) -> ValidationResult {
        validate_deployment_config(config)
    }

    pub fn validate_pipeline_stage(
        &self,
        stage: &str,
        config: &DeploymentConfig,
    ) -> StageValidationResult {
        validate_pipeline_stage(stage, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChangePattern;
    use serde_json::json;

    fn simulator() -> Simulator {
        let mut store = RuleStore::default();
        store.patterns.insert(
            "scale_down_replicas".to_string(),
            ChangePattern {
                keywords: vec!["reduce replicas".to_string(), "scale down".to_string()],
                risk_level: RiskLevel::High,
                impacts: vec!["Reduced availability".to_string()],
                safe_conditions: vec!["Traffic is low".to_string()],
                safeguards: vec!["Monitor error rates".to_string()],
                description: "Reducing replica count".to_string(),
                example: "Reduce replicas from 3 to 1".to_string(),
            },
        );
        store.patterns.insert(
            "restart_service".to_string(),
            ChangePattern {
                keywords: vec!["restart".to_string()],
                risk_level: RiskLevel::Medium,
                ..ChangePattern::default()
            },
        );
        store
            .risk_definitions
            .entry(RiskLevel::High)
            .or_default()
            .insert("description".to_string(), json!("Significant impact possible"));
        Simulator::new(Arc::new(store))
    }

    #[test]
    fn matched_analysis_copies_pattern_metadata() {
        let sim = simulator();
        let record = sim.analyze("What happens if I reduce replicas from 3 to 1?");
        assert_eq!(record.matched_pattern.as_deref(), Some("scale_down_replicas"));
        assert_eq!(record.risk_level, RiskLevel::High);
        assert!(record.requires_manual_review);
        assert_eq!(record.impact, vec!["Reduced availability"]);
        assert_eq!(record.risk_definition["description"], json!("Significant impact possible"));
        assert!(record.message.is_none());
    }

    #[test]
    fn unmatched_analysis_returns_unknown_and_counts_it() {
        let sim = simulator();
        let record = sim.analyze("repaint the office walls");
        assert_eq!(record.risk_level, RiskLevel::Unknown);
        assert!(record.matched_pattern.is_none());
        assert_eq!(record.recommendation.as_deref(), Some("Manual review required"));
        assert!(!record.requires_manual_review);

        let snapshot = sim.statistics();
        assert_eq!(snapshot.risk_distribution.get(&RiskLevel::Unknown), Some(&1));
        assert_eq!(snapshot.summary.total_analyses, 1);
        assert!(snapshot.top_patterns.is_empty());
    }

    #[test]
    fn empty_rule_store_always_returns_unknown() {
        let sim = Simulator::new(Arc::new(RuleStore::default()));
        let record = sim.analyze("reduce replicas from 3 to 1");
        assert_eq!(record.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn list_supported_changes_preserves_order() {
        let sim = simulator();
        let listed = sim.list_supported_changes();
        let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["scale_down_replicas", "restart_service"]);
        assert_eq!(listed[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn read_only_operations_are_idempotent() {
        let sim = simulator();
        let first = serde_json::to_value(sim.list_supported_changes()).unwrap();
        let second = serde_json::to_value(sim.list_supported_changes()).unwrap();
        assert_eq!(first, second);

        let query_one = serde_json::to_value(sim.search("replica")).unwrap();
        let query_two = serde_json::to_value(sim.search("replica")).unwrap();
        assert_eq!(query_one, query_two);
    }

    #[test]
    fn lenient_record_deserialization_defaults_to_unknown() {
        let record: AnalysisRecord =
            serde_json::from_value(json!({"change_description": "something"})).unwrap();
        assert_eq!(record.risk_level, RiskLevel::Unknown);
        assert!(!record.requires_manual_review);
    }
}
