//! Diff entry point.

use super::change::{Change, ChangeType};
use super::detect;
use super::error::DiffError;
use super::impact::ImpactLevel;
use super::strategy::{Compatibility, DiffSummary, MigrationStrategy, StrategySynthesizer};
use crate::config::DiffOptions;
use crate::schema::SchemaTree;
use serde::Serialize;
use tracing::debug;

/// Complete analysis of one schema pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Counts per impact level.
    pub summary: DiffSummary,
    /// Changes in detection order.
    pub changes: Vec<Change>,
    /// Overall verdict.
    pub compatibility: Compatibility,
    /// Proposed strategies; empty unless requested.
    pub migration_strategies: Vec<MigrationStrategy>,
    /// Duration estimate.
    pub timeline: String,
    /// Free-text risk assessment.
    pub risk_assessment: String,
}

impl DiffResult {
    /// Changes with BREAKING impact.
    pub fn breaking_changes(&self) -> Vec<&Change> {
        self.changes_with_impact(ImpactLevel::Breaking)
    }

    /// Check if any change is breaking.
    pub fn has_breaking_changes(&self) -> bool {
        self.summary.breaking > 0
    }

    /// Changes with exactly the given impact.
    pub fn changes_with_impact(&self, impact: ImpactLevel) -> Vec<&Change> {
        self.changes.iter().filter(|c| c.impact == impact).collect()
    }

    /// Changes of the given type.
    pub fn changes_of_type(&self, change_type: ChangeType) -> Vec<&Change> {
        self.changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .collect()
    }

    /// Find the change recorded at `path`.
    pub fn change_at(&self, path: &str) -> Option<&Change> {
        self.changes.iter().find(|c| c.path == path)
    }

    /// Check if the schemas are compatible.
    pub fn is_compatible(&self) -> bool {
        self.compatibility == Compatibility::Compatible
    }

    /// Check if the schemas are identical.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compare two schemas and assess the migration.
///
/// Fails only on malformed input: a cycle, a node of unknown kind, or a node
/// id that does not belong to its tree.
pub fn diff(
    old: &SchemaTree,
    new: &SchemaTree,
    options: &DiffOptions,
) -> Result<DiffResult, DiffError> {
    let mut changes = detect::detect(old, new, options.detect_renames)?;

    if options.generate_migration {
        for change in &mut changes {
            change.migration = Some(change.migration_hint());
        }
    }

    let synthesis = StrategySynthesizer::synthesize(&changes);

    debug!(
        total = synthesis.summary.total,
        breaking = synthesis.summary.breaking,
        major = synthesis.summary.major,
        minor = synthesis.summary.minor,
        compatibility = %synthesis.compatibility,
        strategies = synthesis.strategies.len(),
        "schema diff complete"
    );

    Ok(DiffResult {
        summary: synthesis.summary,
        changes,
        compatibility: synthesis.compatibility,
        migration_strategies: if options.include_strategies {
            synthesis.strategies
        } else {
            Vec::new()
        },
        timeline: synthesis.timeline,
        risk_assessment: synthesis.risk_assessment,
    })
}
