//! Deployment configuration validation.
//!
//! A rule-based checker over a deployment config record, independent of
//! the pattern classifier. Each rule appends at most one finding; the
//! production escalation rule runs last because it reads the findings
//! accumulated by the rules before it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const MIN_REPLICAS: u32 = 2;
const OPTIMAL_REPLICAS: u32 = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    fn blocking(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

/// Resource requests/limits block. Only the presence of limits matters to
/// the rules; contents are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSpec {
    pub limits: Map<String, Value>,
}

/// Externally supplied deployment configuration. Unknown fields are
/// ignored; absent fields take fail-safe defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub replicas: u32,
    pub resources: ResourceSpec,
    #[serde(rename = "healthCheck")]
    pub health_check: Map<String, Value>,
    pub environment: String,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            replicas: 0,
            resources: ResourceSpec::default(),
            health_check: Map::new(),
            environment: "unknown".to_string(),
        }
    }
}

/// One validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub total_issues: usize,
    pub total_warnings: usize,
    /// Issues with HIGH or CRITICAL severity.
    pub blocking_issues: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Verdict {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "PROCEED WITH CAUTION")]
    ProceedWithCaution,
    #[serde(rename = "BLOCK DEPLOYMENT")]
    BlockDeployment,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub environment: String,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub summary: ValidationSummary,
    pub recommendation: Verdict,
}

/// Validate a deployment configuration. Rules run in a fixed order; the
/// verdict blocks on any issue and cautions on warnings alone.
pub fn validate_deployment_config(config: &DeploymentConfig) -> ValidationResult {
    let mut issues = Vec::new();
    let mut warnings = Vec::new();

    if config.replicas < MIN_REPLICAS {
        issues.push(Finding {
            severity: Severity::High,
            field: "replicas".to_string(),
            message: format!(
                "Replica count ({}) is below recommended minimum of {}",
                config.replicas, MIN_REPLICAS
            ),
            recommendation: format!(
                "Increase replicas to at least {MIN_REPLICAS} for high availability"
            ),
        });
    } else if config.replicas < OPTIMAL_REPLICAS {
        warnings.push(Finding {
            severity: Severity::Medium,
            field: "replicas".to_string(),
            message: format!(
                "Replica count ({}) is below optimal count of {}",
                config.replicas, OPTIMAL_REPLICAS
            ),
            recommendation: format!(
                "Consider increasing to {OPTIMAL_REPLICAS} replicas for better fault tolerance"
            ),
        });
    }

    if config.resources.limits.is_empty() {
        warnings.push(Finding {
            severity: Severity::Medium,
            field: "resources.limits".to_string(),
            message: "No resource limits defined".to_string(),
            recommendation: "Define CPU and memory limits to prevent resource exhaustion"
                .to_string(),
        });
    }

    if config.health_check.is_empty() {
        issues.push(Finding {
            severity: Severity::Medium,
            field: "healthCheck".to_string(),
            message: "No health check configured".to_string(),
            recommendation: "Add liveness and readiness probes".to_string(),
        });
    }

    // Must run after the rules above: escalates only when something is
    // already wrong.
    if config.environment == "production" && !issues.is_empty() {
        issues.push(Finding {
            severity: Severity::Critical,
            field: "environment".to_string(),
            message: "Production deployment has blocking issues".to_string(),
            recommendation: "Resolve all HIGH severity issues before production deployment"
                .to_string(),
        });
    }

    let recommendation = if !issues.is_empty() {
        Verdict::BlockDeployment
    } else if !warnings.is_empty() {
        Verdict::ProceedWithCaution
    } else {
        Verdict::Approved
    };

    ValidationResult {
        valid: issues.is_empty(),
        environment: config.environment.clone(),
        summary: ValidationSummary {
            total_issues: issues.len(),
            total_warnings: warnings.len(),
            blocking_issues: issues.iter().filter(|i| i.severity.blocking()).count(),
        },
        recommendation,
        issues,
        warnings,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageFinding {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageValidationResult {
    pub stage: String,
    pub valid: bool,
    pub issues: Vec<StageFinding>,
}

struct StageRequirements {
    min_replicas: u32,
    require_health_check: bool,
}

/// Fixed per-stage requirement table. Unrecognized stage names fall back
/// to the production profile, the strictest one.
fn stage_requirements(stage: &str) -> StageRequirements {
    match stage.to_lowercase().as_str() {
        "dev" => StageRequirements { min_replicas: 1, require_health_check: false },
        "staging" => StageRequirements { min_replicas: 2, require_health_check: true },
        _ => StageRequirements { min_replicas: 3, require_health_check: true },
    }
}

/// Validate a configuration against the requirements of one pipeline
/// stage (dev, staging, production).
pub fn validate_pipeline_stage(stage: &str, config: &DeploymentConfig) -> StageValidationResult {
    let requirements = stage_requirements(stage);
    let mut issues = Vec::new();

    if config.replicas < requirements.min_replicas {
        issues.push(StageFinding {
            severity: Severity::High,
            message: format!("{} requires at least {} replicas", stage, requirements.min_replicas),
        });
    }

    if requirements.require_health_check && config.health_check.is_empty() {
        issues.push(StageFinding {
            severity: Severity::High,
            message: format!("{stage} requires health check configuration"),
        });
    }

    StageValidationResult { stage: stage.to_string(), valid: issues.is_empty(), issues }
}
