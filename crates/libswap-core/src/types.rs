//! Core types for the migration engine
//!
//! Defines:
//! - Migration configuration
//! - Pipeline stages and error log entries
//! - Per-instance outcomes and the aggregated run report

use crate::reapply::ReapplyStats;
use libswap_model::{ComponentKey, Direction, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Migration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Horizontal gap between a container and its clone
    pub clone_gap: f64,
    /// Name suffix for clones migrated web → app
    pub web_to_app_suffix: String,
    /// Name suffix for clones migrated app → web
    pub app_to_web_suffix: String,
    /// Match overrides by structural position when descendant ids changed
    pub structural_fallback: bool,
    /// Skip instances removed by an enclosing instance's swap
    pub skip_replaced_instances: bool,
}

impl MigrationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With clone gap
    #[inline]
    #[must_use]
    pub fn with_clone_gap(mut self, gap: f64) -> Self {
        self.clone_gap = gap;
        self
    }

    /// With structural fallback enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_structural_fallback(mut self, enabled: bool) -> Self {
        self.structural_fallback = enabled;
        self
    }

    /// With replaced-instance skipping enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_skip_replaced(mut self, enabled: bool) -> Self {
        self.skip_replaced_instances = enabled;
        self
    }

    /// Name suffix for a direction
    #[inline]
    #[must_use]
    pub fn suffix(&self, direction: Direction) -> &str {
        match direction {
            Direction::WebToApp => &self.web_to_app_suffix,
            Direction::AppToWeb => &self.app_to_web_suffix,
        }
    }

    /// Name given to a migrated clone
    #[must_use]
    pub fn clone_name(&self, original: &str, direction: Direction) -> String {
        format!("{} ({})", original, self.suffix(direction))
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            clone_gap: 50.0,
            web_to_app_suffix: "App".to_string(),
            app_to_web_suffix: "Web".to_string(),
            structural_fallback: true,
            skip_replaced_instances: true,
        }
    }
}

/// Swap pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Capture,
    ResolveMainComponent,
    ImportReplacement,
    Swap,
    ApplyOverrides,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 5] = [
        Stage::Capture,
        Stage::ResolveMainComponent,
        Stage::ImportReplacement,
        Stage::Swap,
        Stage::ApplyOverrides,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Capture => "capture",
            Stage::ResolveMainComponent => "resolve-main-component",
            Stage::ImportReplacement => "import-replacement",
            Stage::Swap => "swap",
            Stage::ApplyOverrides => "apply-overrides",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogEntry {
    pub instance_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_key: Option<ComponentKey>,
    pub stage: Stage,
    pub error_message: String,
}

/// Why an instance was left unmigrated without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// Neither the component key nor its group key is mapped
    NoMapping,
    /// The instance was regenerated away by an enclosing instance's swap
    Replaced,
}

/// Result of running the pipeline on one instance
#[derive(Debug, Clone, PartialEq)]
pub enum SwapOutcome {
    /// Instance now references the target component
    Swapped {
        instance: NodeId,
        from: ComponentKey,
        to: ComponentKey,
        reapplied: ReapplyStats,
    },
    /// Instance left untouched
    Skipped { instance: NodeId, reason: SkipReason },
    /// First failing stage
    Failed(ErrorLogEntry),
}

impl SwapOutcome {
    /// Instance this outcome is about
    #[must_use]
    pub fn instance(&self) -> &NodeId {
        match self {
            SwapOutcome::Swapped { instance, .. } | SwapOutcome::Skipped { instance, .. } => {
                instance
            }
            SwapOutcome::Failed(entry) => &entry.instance_id,
        }
    }

    /// Check if the instance was swapped
    #[inline]
    #[must_use]
    pub fn is_swapped(&self) -> bool {
        matches!(self, SwapOutcome::Swapped { .. })
    }

    /// Check if the instance failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SwapOutcome::Failed(_))
    }
}

/// Counts over all processed instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub instances: usize,
    pub swapped: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// A container and the clone that was migrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonedContainer {
    pub source: NodeId,
    pub clone: NodeId,
    pub name: String,
}

/// Aggregated result of one migration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub direction: Direction,
    pub errors: Vec<ErrorLogEntry>,
    pub summary: MigrationSummary,
    pub containers: Vec<ClonedContainer>,
}

impl MigrationReport {
    /// Empty report for a direction
    #[inline]
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            errors: Vec::new(),
            summary: MigrationSummary::default(),
            containers: Vec::new(),
        }
    }

    /// Fold one instance outcome into the report
    pub fn record(&mut self, outcome: SwapOutcome) {
        self.summary.instances += 1;
        match outcome {
            SwapOutcome::Swapped { .. } => self.summary.swapped += 1,
            SwapOutcome::Skipped { .. } => self.summary.skipped += 1,
            SwapOutcome::Failed(entry) => {
                self.summary.failed += 1;
                self.errors.push(entry);
            }
        }
    }

    /// Check if any instance failed
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MigrationConfig::new();
        assert_eq!(config.clone_gap, 50.0);
        assert!(config.structural_fallback);
        assert_eq!(config.clone_name("Checkout", Direction::WebToApp), "Checkout (App)");
        assert_eq!(config.clone_name("Checkout", Direction::AppToWeb), "Checkout (Web)");
    }

    #[test]
    fn config_partial_deserialize() {
        let config: MigrationConfig = serde_json::from_str(r#"{"clone_gap": 80}"#).unwrap();
        assert_eq!(config.clone_gap, 80.0);
        assert_eq!(config.web_to_app_suffix, "App");
    }

    #[test]
    fn stage_wire_names() {
        for stage in Stage::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
        }
    }

    #[test]
    fn error_entry_wire_shape() {
        let entry = ErrorLogEntry {
            instance_id: NodeId::new("1:2"),
            component_name: Some("Button".to_string()),
            component_key: None,
            stage: Stage::ImportReplacement,
            error_message: "not published".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["instanceId"], "1:2");
        assert_eq!(json["stage"], "import-replacement");
        assert_eq!(json["errorMessage"], "not published");
        assert!(json.get("componentKey").is_none());
    }

    #[test]
    fn report_counts_outcomes() {
        let mut report = MigrationReport::new(Direction::WebToApp);
        report.record(SwapOutcome::Skipped {
            instance: NodeId::new("a"),
            reason: SkipReason::NoMapping,
        });
        report.record(SwapOutcome::Failed(ErrorLogEntry {
            instance_id: NodeId::new("b"),
            component_name: None,
            component_key: None,
            stage: Stage::Capture,
            error_message: "boom".to_string(),
        }));

        assert_eq!(report.summary.instances, 2);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.failed, 1);
        assert!(report.has_errors());
    }
}
