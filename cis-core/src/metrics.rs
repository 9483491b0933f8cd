//! Process-lifetime analysis metrics.
//!
//! Counters are monotonic for the life of the process; nothing is ever
//! deleted and nothing is persisted. `record` and `snapshot` serialize on
//! a single mutex, which is plenty at the call volumes involved.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use crate::analyze::AnalysisRecord;
use crate::risk::RiskLevel;

const RECENT_CAPACITY: usize = 10;
const TOP_PATTERNS: usize = 5;

/// Condensed view of one analysis, kept in the recent-history ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub timestamp: String,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub requires_review: bool,
}

#[derive(Debug, Default)]
struct MetricsState {
    total: u64,
    risk_distribution: BTreeMap<RiskLevel, u64>,
    /// Insertion order doubles as the tie-break for `top_patterns`.
    pattern_usage: IndexMap<String, u64>,
    recent: VecDeque<AnalysisSummary>,
}

/// Collects analytics on change analyses for the life of the process.
#[derive(Debug)]
pub struct MetricsCollector {
    started_at: DateTime<Utc>,
    state: Mutex<MetricsState>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            state: Mutex::new(MetricsState::default()),
        }
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one analysis. UNKNOWN results count toward the risk
    /// distribution; only matched results count toward pattern usage.
    pub fn record(&self, record: &AnalysisRecord) {
        let mut state = self.state.lock().expect("metrics lock poisoned");
        state.total += 1;
        *state.risk_distribution.entry(record.risk_level).or_insert(0) += 1;
        if let Some(pattern) = &record.matched_pattern {
            *state.pattern_usage.entry(pattern.clone()).or_insert(0) += 1;
        }
        if state.recent.len() == RECENT_CAPACITY {
            state.recent.pop_front();
        }
        state.recent.push_back(AnalysisSummary {
            timestamp: record.timestamp.clone(),
            risk_level: record.risk_level,
            pattern: record.matched_pattern.clone(),
            requires_review: record.requires_manual_review,
        });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock().expect("metrics lock poisoned");

        let high_risk = state.risk_distribution.get(&RiskLevel::High).copied().unwrap_or(0)
            + state.risk_distribution.get(&RiskLevel::Critical).copied().unwrap_or(0);
        let percentage = high_risk as f64 / state.total.max(1) as f64 * 100.0;

        // Stable sort keeps insertion order for equal counts.
        let mut top: Vec<(String, u64)> =
            state.pattern_usage.iter().map(|(name, count)| (name.clone(), *count)).collect();
        top.sort_by(|a, b| b.1.cmp(&a.1));
        top.truncate(TOP_PATTERNS);

        MetricsSnapshot {
            summary: MetricsSummary {
                total_analyses: state.total,
                uptime_seconds: (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0,
                high_risk_percentage: (percentage * 100.0).round() / 100.0,
            },
            risk_distribution: state.risk_distribution.clone(),
            top_patterns: top,
            recent_analyses: state.recent.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_analyses: u64,
    pub uptime_seconds: f64,
    pub high_risk_percentage: f64,
}

/// Aggregated view over all analyses seen since process start.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub summary: MetricsSummary,
    pub risk_distribution: BTreeMap<RiskLevel, u64>,
    pub top_patterns: Vec<(String, u64)>,
    pub recent_analyses: Vec<AnalysisSummary>,
}
