//! Review task and approval chain planning.
//!
//! Both operations are pure functions of an analysis record and the
//! configured stages. Stage selection is a set union over `required_for`,
//! not a first-match search: every stage listing the record's risk level
//! participates, in configured order.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analyze::AnalysisRecord;
use crate::risk::RiskLevel;
use crate::store::ApprovalStage;

const ADVISORY_NOTE: &str = "Advisory only - no execution, no automation";
const WORKFLOW_NOTE: &str = "This is an advisory workflow. No automatic execution will occur.";
const HOURS_PER_STAGE: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Medium,
    High,
}

/// Advisory manual-review task for a high-risk change.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewTask {
    pub task_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Create a review task iff the record's risk level demands manual review.
pub fn create_review_task(record: &AnalysisRecord) -> ReviewTask {
    if !record.risk_level.requires_manual_review() {
        return ReviewTask {
            task_created: false,
            reason: Some("Risk level does not require manual review".to_string()),
            task_type: None,
            priority: None,
            timestamp: None,
            change_description: None,
            risk_level: None,
            note: None,
        };
    }

    let priority = if record.risk_level == RiskLevel::Critical {
        TaskPriority::High
    } else {
        TaskPriority::Medium
    };

    ReviewTask {
        task_created: true,
        reason: None,
        task_type: Some("MANUAL_REVIEW_REQUIRED".to_string()),
        priority: Some(priority),
        timestamp: Some(Utc::now().to_rfc3339()),
        change_description: Some(record.change_description.clone()),
        risk_level: Some(record.risk_level),
        note: Some(ADVISORY_NOTE.to_string()),
    }
}

/// Stage subset selected into an approval chain.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedStage {
    pub stage: String,
    pub description: String,
    pub auto_approve: bool,
    pub approvers: Vec<String>,
}

/// Policy-derived approval plan for one analyzed change.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalChain {
    pub requires_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub approval_stages: Vec<SelectedStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_approval_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Select every configured stage whose `required_for` set contains the
/// record's risk level, preserving configuration order.
pub fn required_stages<'a>(
    stages: &'a [ApprovalStage],
    level: RiskLevel,
) -> Vec<&'a ApprovalStage> {
    stages.iter().filter(|stage| stage.required_for(level)).collect()
}

/// Build the approval chain for an analyzed change, or report that none is
/// required. Workflow ids are unique per call within the resolution of the
/// timestamp; no cross-process guarantee is made.
pub fn create_approval_chain(stages: &[ApprovalStage], record: &AnalysisRecord) -> ApprovalChain {
    let required = required_stages(stages, record.risk_level);
    if required.is_empty() {
        return ApprovalChain {
            requires_approval: false,
            reason: Some("Risk level does not require approval workflow".to_string()),
            risk_level: None,
            change_description: None,
            approval_stages: Vec::new(),
            estimated_approval_time: None,
            workflow_id: None,
            status: None,
            note: None,
        };
    }

    let selected: Vec<SelectedStage> = required
        .iter()
        .map(|stage| SelectedStage {
            stage: stage.name.clone(),
            description: stage.description.clone(),
            auto_approve: stage.auto_approve,
            approvers: stage.approvers.clone(),
        })
        .collect();

    ApprovalChain {
        requires_approval: true,
        reason: None,
        risk_level: Some(record.risk_level),
        change_description: Some(record.change_description.clone()),
        estimated_approval_time: Some(estimate_approval_time(selected.len())),
        workflow_id: Some(format!("WF-{}", Utc::now().format("%Y%m%d%H%M%S%f"))),
        status: Some("PENDING_APPROVAL".to_string()),
        note: Some(WORKFLOW_NOTE.to_string()),
        approval_stages: selected,
    }
}

/// Two hours per stage, bucketed into a human-readable estimate.
fn estimate_approval_time(stage_count: usize) -> String {
    let hours = stage_count * HOURS_PER_STAGE;
    if hours <= 4 {
        "Same day".to_string()
    } else if hours <= 24 {
        "Within 24 hours".to_string()
    } else {
        format!("{} business days", hours / 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: RiskLevel) -> AnalysisRecord {
        AnalysisRecord {
            change_description: "reduce replicas from 3 to 1".to_string(),
            risk_level: level,
            requires_manual_review: level.requires_manual_review(),
            ..AnalysisRecord::default()
        }
    }

    fn stage(name: &str, required_for: &[RiskLevel]) -> ApprovalStage {
        ApprovalStage {
            name: name.to_string(),
            required_for: required_for.to_vec(),
            ..ApprovalStage::default()
        }
    }

    #[test]
    fn review_task_only_for_high_and_critical() {
        assert!(!create_review_task(&record(RiskLevel::Low)).task_created);
        assert!(!create_review_task(&record(RiskLevel::Medium)).task_created);
        assert!(!create_review_task(&record(RiskLevel::Unknown)).task_created);

        let high = create_review_task(&record(RiskLevel::High));
        assert!(high.task_created);
        assert_eq!(high.priority, Some(TaskPriority::Medium));
        assert_eq!(high.task_type.as_deref(), Some("MANUAL_REVIEW_REQUIRED"));

        let critical = create_review_task(&record(RiskLevel::Critical));
        assert_eq!(critical.priority, Some(TaskPriority::High));
    }

    #[test]
    fn declined_task_carries_a_reason() {
        let task = create_review_task(&record(RiskLevel::Low));
        assert!(task.reason.is_some());
        assert!(task.priority.is_none());
    }

    #[test]
    fn chain_selects_all_matching_stages_in_order() {
        let stages = vec![
            stage("peer_review", &[RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical]),
            stage("team_lead", &[RiskLevel::High, RiskLevel::Critical]),
            stage("change_board", &[RiskLevel::Critical]),
        ];

        let chain = create_approval_chain(&stages, &record(RiskLevel::High));
        assert!(chain.requires_approval);
        let names: Vec<_> = chain.approval_stages.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(names, vec!["peer_review", "team_lead"]);
        assert_eq!(chain.status.as_deref(), Some("PENDING_APPROVAL"));
        assert!(chain.workflow_id.unwrap().starts_with("WF-"));
    }

    #[test]
    fn chain_declines_when_no_stage_matches() {
        let stages = vec![stage("change_board", &[RiskLevel::Critical])];
        let chain = create_approval_chain(&stages, &record(RiskLevel::Low));
        assert!(!chain.requires_approval);
        assert!(chain.reason.is_some());
        assert!(chain.approval_stages.is_empty());
    }

    #[test]
    fn unknown_risk_never_requires_approval_unless_configured() {
        let stages = vec![
            stage("peer_review", &[RiskLevel::Medium]),
            stage("change_board", &[RiskLevel::Critical]),
        ];
        let chain = create_approval_chain(&stages, &record(RiskLevel::Unknown));
        assert!(!chain.requires_approval);
    }

    #[test]
    fn approval_time_buckets() {
        assert_eq!(estimate_approval_time(1), "Same day");
        assert_eq!(estimate_approval_time(2), "Same day");
        assert_eq!(estimate_approval_time(3), "Within 24 hours");
        assert_eq!(estimate_approval_time(12), "Within 24 hours");
        assert_eq!(estimate_approval_time(13), "1 business days");
        assert_eq!(estimate_approval_time(24), "2 business days");
    }
}
