//! Configuration loading for the Change Impact Simulator.
//!
//! This crate provides:
//! - YAML loading of the four rule documents (knowledge base, change
//!   patterns, risk definitions, approval workflow)
//! - Industry-mode override resolution (`<stem>_<mode>.yaml` shadows
//!   `<stem>.yaml` when present)
//! - Rule-set validation before the immutable [`RuleStore`] is handed to
//!   the core
//!
//! Missing documents degrade to an empty section with a warning, matching
//! the fail-safe posture of the simulator: an empty rule store is legal
//! and simply classifies everything as UNKNOWN.

mod error;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use cis_core::{ApprovalStage, ChangePattern, KnowledgeEntry, RiskLevel, RuleStore};

pub use error::{ConfigError, ConfigResult};

/// Industry mode used when none is selected.
pub const DEFAULT_MODE: &str = "general";

const KNOWLEDGE_BASE: &str = "knowledge_base";
const CHANGE_PATTERNS: &str = "change_patterns";
const RISK_DEFINITIONS: &str = "risk_definitions";
const WORKFLOWS: &str = "workflows";

/// Resolve which file backs a document for the given mode: the
/// industry-specific variant `<stem>_<mode>.yaml` when it exists, the base
/// `<stem>.yaml` otherwise. Pure apart from the existence probe.
pub fn resolve_document_path(dir: &Path, stem: &str, mode: &str) -> PathBuf {
    let variant = dir.join(format!("{stem}_{mode}.yaml"));
    if variant.exists() { variant } else { dir.join(format!("{stem}.yaml")) }
}

/// Shape of `workflows.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkflowDocument {
    approval_workflow: ApprovalWorkflow,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApprovalWorkflow {
    stages: Vec<ApprovalStage>,
}

fn load_document<T: serde::de::DeserializeOwned + Default>(
    dir: &Path,
    stem: &str,
    mode: &str,
) -> ConfigResult<T> {
    let path = resolve_document_path(dir, stem, mode);
    if !path.exists() {
        warn!(document = stem, "config document not found, using empty defaults");
        return Ok(T::default());
    }
    if path != dir.join(format!("{stem}.yaml")) {
        info!(document = stem, mode, "loading industry-specific config");
    }
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml { path, source })
}

/// Reject keywords that are empty after trimming: an empty keyword is a
/// substring of every input and would short-circuit the whole rule set.
fn validate_patterns(patterns: &IndexMap<String, ChangePattern>) -> ConfigResult<()> {
    for (name, pattern) in patterns {
        if pattern.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::EmptyKeyword { pattern: name.clone() });
        }
    }
    Ok(())
}

/// Load and validate the full rule store for the selected industry mode.
/// The returned store is immutable for the process lifetime; the core
/// never learns which mode produced it.
pub fn load_rule_store(dir: impl AsRef<Path>, mode: &str) -> ConfigResult<RuleStore> {
    let dir = dir.as_ref();

    let knowledge: IndexMap<String, Vec<KnowledgeEntry>> =
        load_document(dir, KNOWLEDGE_BASE, mode)?;
    let patterns: IndexMap<String, ChangePattern> = load_document(dir, CHANGE_PATTERNS, mode)?;
    let risk_definitions: BTreeMap<RiskLevel, Map<String, Value>> =
        load_document(dir, RISK_DEFINITIONS, mode)?;
    let workflows: WorkflowDocument = load_document(dir, WORKFLOWS, mode)?;

    validate_patterns(&patterns)?;

    info!(
        patterns = patterns.len(),
        knowledge_categories = knowledge.len(),
        approval_stages = workflows.approval_workflow.stages.len(),
        mode,
        "rule store loaded"
    );

    Ok(RuleStore {
        knowledge,
        patterns,
        risk_definitions,
        approval_stages: workflows.approval_workflow.stages,
    })
}
