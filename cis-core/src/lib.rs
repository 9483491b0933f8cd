//! Change Impact Simulator core.
//!
//! This crate provides:
//! - First-match-wins keyword classification of change descriptions
//! - Risk analysis with configured risk definitions
//! - Review task and approval chain planning
//! - Deployment configuration validation
//! - Process-lifetime analysis metrics
//!
//! Everything here is advisory. The simulator never executes a change; it
//! only classifies text against an operator-supplied rule set and reports
//! what the configured policy says about it.

mod analyze;
mod approval;
mod classify;
mod deploy;
mod metrics;
mod risk;
mod store;

pub use analyze::{AnalysisRecord, Simulator, SupportedChange};
pub use approval::{ApprovalChain, ReviewTask, SelectedStage, TaskPriority};
pub use classify::{KnowledgeHit, match_pattern, search_knowledge};
pub use deploy::{
    DeploymentConfig, Finding, ResourceSpec, Severity, StageFinding, StageValidationResult,
    ValidationResult, ValidationSummary, Verdict, validate_deployment_config,
    validate_pipeline_stage,
};
pub use metrics::{AnalysisSummary, MetricsCollector, MetricsSnapshot, MetricsSummary};
pub use risk::RiskLevel;
pub use store::{ApprovalStage, ChangePattern, KnowledgeEntry, RuleStore};
