//! Immutable rule data the simulator is constructed with.
//!
//! The store is populated once by the configuration loader and never
//! re-read. Pattern iteration order is significant: the classifier walks
//! `patterns` in insertion order and the first keyword hit wins, which is
//! why an [`IndexMap`] is used rather than a hash map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::risk::RiskLevel;

/// A single knowledge base entry. The category is the key of the grouping
/// map in [`RuleStore::knowledge`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeEntry {
    pub title: String,
    pub content: String,
}

/// A named rule associating trigger keywords with a risk level and
/// remediation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangePattern {
    pub keywords: Vec<String>,
    /// Defaults to MEDIUM when the config omits it. A configuration gap,
    /// not an error.
    pub risk_level: RiskLevel,
    pub impacts: Vec<String>,
    pub safe_conditions: Vec<String>,
    pub safeguards: Vec<String>,
    pub description: String,
    pub example: String,
}

impl Default for ChangePattern {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            risk_level: RiskLevel::Medium,
            impacts: Vec::new(),
            safe_conditions: Vec::new(),
            safeguards: Vec::new(),
            description: String::new(),
            example: String::new(),
        }
    }
}

/// One stage of the configured approval workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalStage {
    pub name: String,
    pub description: String,
    pub auto_approve: bool,
    pub approvers: Vec<String>,
    /// Risk levels for which this stage is mandatory.
    pub required_for: Vec<RiskLevel>,
}

impl ApprovalStage {
    pub fn required_for(&self, level: RiskLevel) -> bool {
        self.required_for.contains(&level)
    }
}

/// The full rule set the simulator operates on. Write-once at startup,
/// read-many thereafter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleStore {
    /// Knowledge entries grouped by category, in configured order.
    pub knowledge: IndexMap<String, Vec<KnowledgeEntry>>,
    /// Change patterns keyed by unique name. Insertion order defines match
    /// priority.
    pub patterns: IndexMap<String, ChangePattern>,
    /// Free-form descriptive attributes per risk level.
    pub risk_definitions: BTreeMap<RiskLevel, Map<String, Value>>,
    /// Approval workflow stages in configured order.
    pub approval_stages: Vec<ApprovalStage>,
}

impl RuleStore {
    /// Risk definition for a level, or an empty map when the config does
    /// not define one. Never fails.
    pub fn risk_definition(&self, level: RiskLevel) -> Map<String, Value> {
        self.risk_definitions.get(&level).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_risk_level_defaults_to_medium() {
        let pattern: ChangePattern = serde_yaml::from_str(
            "keywords:\n  - reduce replicas\ndescription: scale down\n",
        )
        .unwrap();
        assert_eq!(pattern.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn patterns_preserve_document_order() {
        let patterns: IndexMap<String, ChangePattern> = serde_yaml::from_str(
            "zeta:\n  keywords: [z]\nalpha:\n  keywords: [a]\nmiddle:\n  keywords: [m]\n",
        )
        .unwrap();
        let names: Vec<_> = patterns.keys().cloned().collect();
        assert_eq!(names, vec!["zeta", "alpha", "middle"]);
    }

    #[test]
    fn missing_risk_definition_is_empty() {
        let store = RuleStore::default();
        assert!(store.risk_definition(RiskLevel::High).is_empty());
    }
}
