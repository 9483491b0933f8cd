//! Tool registry and dispatch.
//!
//! The wire layer stays out of `cis-core`: this module translates a tool
//! name plus a JSON argument object into a core call and serializes the
//! result back to JSON. Missing optional record fields degrade (risk
//! level falls back to UNKNOWN via lenient deserialization); missing
//! structurally required arguments are rejected as malformed input.

use serde::Serialize;
use serde_json::Value;

use cis_core::{AnalysisRecord, DeploymentConfig, Simulator};

use crate::error::ToolError;

/// Advertised tool catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "search_knowledge",
        description: "Search engineering knowledge base",
    },
    ToolDescriptor {
        name: "analyze_change",
        description: "Analyze a proposed change and assess risk",
    },
    ToolDescriptor {
        name: "create_review_task",
        description: "Create advisory review task for high-risk changes",
    },
    ToolDescriptor {
        name: "list_supported_changes",
        description: "List all supported change patterns",
    },
    ToolDescriptor {
        name: "get_analysis_statistics",
        description: "Get statistics about change analyses (total, risk distribution, trends)",
    },
    ToolDescriptor {
        name: "create_approval_workflow",
        description: "Create policy-based approval workflow for a change",
    },
    ToolDescriptor {
        name: "validate_deployment_config",
        description: "Validate a deployment configuration for CI/CD pipeline",
    },
    ToolDescriptor {
        name: "validate_pipeline_stage",
        description: "Validate configuration for a specific pipeline stage (dev/staging/production)",
    },
];

fn string_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::MalformedInput(format!("missing required string argument '{key}'")))
}

/// Parse the `analysis` argument leniently: absent fields take defaults
/// and the risk level degrades to UNKNOWN, but it must be an object.
fn analysis_arg(args: &Value) -> Result<AnalysisRecord, ToolError> {
    let analysis = args
        .get("analysis")
        .filter(|v| v.is_object())
        .ok_or_else(|| ToolError::MalformedInput("'analysis' must be an object".to_string()))?;
    serde_json::from_value(analysis.clone())
        .map_err(|e| ToolError::MalformedInput(format!("invalid 'analysis' record: {e}")))
}

/// Parse the `config` argument. A non-object config is structurally
/// required to be rejected rather than defaulted.
fn config_arg(args: &Value) -> Result<DeploymentConfig, ToolError> {
    let config = args
        .get("config")
        .filter(|v| v.is_object())
        .ok_or_else(|| ToolError::MalformedInput("'config' must be an object".to_string()))?;
    serde_json::from_value(config.clone())
        .map_err(|e| ToolError::MalformedInput(format!("invalid deployment config: {e}")))
}

fn to_json<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Route one tool invocation into the core.
pub fn dispatch_tool(sim: &Simulator, name: &str, args: &Value) -> Result<Value, ToolError> {
    match name {
        "search_knowledge" => Ok(to_json(sim.search(string_arg(args, "query")?))),
        "analyze_change" => Ok(to_json(sim.analyze(string_arg(args, "change_description")?))),
        "create_review_task" => Ok(to_json(sim.create_review_task(&analysis_arg(args)?))),
        "list_supported_changes" => Ok(to_json(sim.list_supported_changes())),
        "get_analysis_statistics" => Ok(to_json(sim.statistics())),
        "create_approval_workflow" => {
            Ok(to_json(sim.create_approval_workflow(&analysis_arg(args)?)))
        }
        "validate_deployment_config" => {
            Ok(to_json(sim.validate_deployment_config(&config_arg(args)?)))
        }
        "validate_pipeline_stage" => {
            let stage = string_arg(args, "stage")?;
            let config = config_arg(args)?;
            Ok(to_json(sim.validate_pipeline_stage(stage, &config)))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Read-only resource lookup: the configured rule documents plus the live
/// statistics snapshot.
pub fn read_resource(sim: &Simulator, name: &str) -> Option<Value> {
    match name {
        "knowledge_base" => Some(to_json(&sim.rules().knowledge)),
        "change_patterns" => Some(to_json(&sim.rules().patterns)),
        "risk_definitions" => Some(to_json(&sim.rules().risk_definitions)),
        "workflows" => Some(to_json(&sim.rules().approval_stages)),
        "statistics" => Some(to_json(sim.statistics())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cis_core::{ChangePattern, RiskLevel, RuleStore};
    use serde_json::json;
    use std::sync::Arc;

    fn simulator() -> Simulator {
        let mut store = RuleStore::default();
        store.patterns.insert(
            "scale_down_replicas".to_string(),
            ChangePattern {
                keywords: vec!["reduce replicas".to_string()],
                risk_level: RiskLevel::High,
                ..ChangePattern::default()
            },
        );
        Simulator::new(Arc::new(store))
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let sim = simulator();
        let err = dispatch_tool(&sim, "execute_change", &json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "execute_change"));
    }

    #[test]
    fn analyze_change_routes_to_the_classifier() {
        let sim = simulator();
        let result = dispatch_tool(
            &sim,
            "analyze_change",
            &json!({"change_description": "reduce replicas to 1"}),
        )
        .unwrap();
        assert_eq!(result["matched_pattern"], "scale_down_replicas");
        assert_eq!(result["risk_level"], "HIGH");
    }

    #[test]
    fn missing_required_argument_is_malformed_input() {
        let sim = simulator();
        let err = dispatch_tool(&sim, "analyze_change", &json!({})).unwrap_err();
        assert!(matches!(err, ToolError::MalformedInput(_)));
    }

    #[test]
    fn review_task_tolerates_partial_analysis_records() {
        let sim = simulator();
        // No risk_level: degrades to UNKNOWN, which declines the task
        // instead of failing the call.
        let result = dispatch_tool(
            &sim,
            "create_review_task",
            &json!({"analysis": {"change_description": "something"}}),
        )
        .unwrap();
        assert_eq!(result["task_created"], false);
    }

    #[test]
    fn non_object_config_is_rejected() {
        let sim = simulator();
        let err =
            dispatch_tool(&sim, "validate_deployment_config", &json!({"config": "three replicas"}))
                .unwrap_err();
        assert!(matches!(err, ToolError::MalformedInput(_)));
    }

    #[test]
    fn pipeline_stage_requires_stage_and_config() {
        let sim = simulator();
        let result = dispatch_tool(
            &sim,
            "validate_pipeline_stage",
            &json!({"stage": "dev", "config": {"replicas": 1}}),
        )
        .unwrap();
        assert_eq!(result["valid"], true);

        let err = dispatch_tool(&sim, "validate_pipeline_stage", &json!({"config": {}})).unwrap_err();
        assert!(matches!(err, ToolError::MalformedInput(_)));
    }

    #[test]
    fn statistics_resource_reflects_recorded_analyses() {
        let sim = simulator();
        dispatch_tool(&sim, "analyze_change", &json!({"change_description": "reduce replicas"}))
            .unwrap();
        let stats = read_resource(&sim, "statistics").unwrap();
        assert_eq!(stats["summary"]["total_analyses"], 1);
        assert!(read_resource(&sim, "secrets").is_none());
    }
}
