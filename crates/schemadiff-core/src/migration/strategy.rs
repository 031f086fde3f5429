//! Migration strategy synthesis.
//!
//! Turns a classified change list into a summary, a compatibility verdict,
//! a set of staged migration strategies, a timeline estimate and a risk
//! assessment. Which strategies are proposed depends only on the severity
//! counts:
//!
//! | Changes present | Strategies |
//! |-----------------|------------|
//! | no BREAKING, no MAJOR | Direct |
//! | MAJOR, no BREAKING | Gradual, Blue-Green |
//! | any BREAKING | Gradual, Blue-Green, Version-Based |

use super::change::{display_path, Change, ChangeType};
use super::impact::ImpactLevel;
use serde::Serialize;

/// Overall compatibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    /// Only MINOR or PATCH changes.
    Compatible,
    /// At least one MAJOR change, nothing BREAKING.
    Risky,
    /// At least one BREAKING change.
    Breaking,
}

impl Compatibility {
    /// Verdict for a set of counts.
    pub fn from_summary(summary: &DiffSummary) -> Self {
        if summary.breaking > 0 {
            Compatibility::Breaking
        } else if summary.major > 0 {
            Compatibility::Risky
        } else {
            Compatibility::Compatible
        }
    }
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compatibility::Compatible => write!(f, "compatible"),
            Compatibility::Risky => write!(f, "risky"),
            Compatibility::Breaking => write!(f, "breaking"),
        }
    }
}

/// Execution risk of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Risk::Low => write!(f, "low"),
            Risk::Medium => write!(f, "medium"),
            Risk::High => write!(f, "high"),
        }
    }
}

/// Change counts per impact level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// BREAKING changes.
    pub breaking: usize,
    /// MAJOR changes.
    pub major: usize,
    /// MINOR changes.
    pub minor: usize,
    /// PATCH changes.
    pub patch: usize,
    /// All changes.
    pub total: usize,
}

impl DiffSummary {
    /// Count the changes per level.
    pub fn from_changes(changes: &[Change]) -> Self {
        let mut summary = DiffSummary::default();
        for change in changes {
            match change.impact {
                ImpactLevel::Breaking => summary.breaking += 1,
                ImpactLevel::Major => summary.major += 1,
                ImpactLevel::Minor => summary.minor += 1,
                ImpactLevel::Patch => summary.patch += 1,
            }
        }
        summary.total = changes.len();
        summary
    }

    /// Number of changes at `level`.
    pub fn count(&self, level: ImpactLevel) -> usize {
        match level {
            ImpactLevel::Breaking => self.breaking,
            ImpactLevel::Major => self.major,
            ImpactLevel::Minor => self.minor,
            ImpactLevel::Patch => self.patch,
        }
    }
}

/// One step of a migration strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStep {
    /// Step identifier, unique within its strategy.
    pub id: String,
    /// Phase number, starting at 1.
    pub phase: u32,
    /// Machine-friendly action name.
    pub action: String,
    /// What the step does.
    pub description: String,
    /// How to confirm the step succeeded.
    pub validation: String,
    /// How to undo the step.
    pub rollback: String,
    /// Steps that must complete first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl MigrationStep {
    fn new(
        id: impl Into<String>,
        phase: u32,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            phase,
            action: action.into(),
            description: description.into(),
            validation: String::new(),
            rollback: String::new(),
            dependencies: Vec::new(),
        }
    }

    fn with_validation(mut self, validation: impl Into<String>) -> Self {
        self.validation = validation.into();
        self
    }

    fn with_rollback(mut self, rollback: impl Into<String>) -> Self {
        self.rollback = rollback.into();
        self
    }

    fn after(mut self, step: &MigrationStep) -> Self {
        self.dependencies.push(step.id.clone());
        self
    }
}

/// A named, risk-rated, staged migration plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStrategy {
    /// Strategy name.
    pub name: String,
    /// What the strategy does.
    pub description: String,
    /// Execution risk.
    pub risk: Risk,
    /// Expected duration.
    pub timeline: String,
    /// Steps in emission order; phases never decrease.
    pub steps: Vec<MigrationStep>,
    /// How to back out of the whole strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_plan: Option<String>,
}

impl MigrationStrategy {
    /// Steps in phase `phase`.
    pub fn steps_in_phase(&self, phase: u32) -> Vec<&MigrationStep> {
        self.steps.iter().filter(|s| s.phase == phase).collect()
    }

    /// Number of distinct phases.
    pub fn phase_count(&self) -> u32 {
        self.steps.iter().map(|s| s.phase).max().unwrap_or(0)
    }
}

/// Everything the synthesizer derives from a change list.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    /// Counts per impact level.
    pub summary: DiffSummary,
    /// Overall verdict.
    pub compatibility: Compatibility,
    /// Proposed strategies, in recommendation order.
    pub strategies: Vec<MigrationStrategy>,
    /// Engine-wide duration estimate.
    pub timeline: String,
    /// Free-text risk assessment.
    pub risk_assessment: String,
}

/// Sequential phase numbers for one strategy.
struct PhaseCounter(u32);

impl PhaseCounter {
    fn new() -> Self {
        PhaseCounter(0)
    }

    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

/// Builds migration strategies from classified changes.
pub struct StrategySynthesizer;

impl StrategySynthesizer {
    /// Synthesize strategies and assessments. Never fails.
    pub fn synthesize(changes: &[Change]) -> Synthesis {
        let summary = DiffSummary::from_changes(changes);

        let strategies = if summary.breaking == 0 && summary.major == 0 {
            vec![Self::direct(changes)]
        } else {
            let mut strategies = vec![Self::gradual(changes), Self::blue_green(changes)];
            if summary.breaking > 0 {
                strategies.push(Self::version_based(&summary));
            }
            strategies
        };

        Synthesis {
            compatibility: Compatibility::from_summary(&summary),
            strategies,
            timeline: Self::estimate_timeline(&summary).to_string(),
            risk_assessment: Self::assess_risk(&summary),
            summary,
        }
    }

    /// Engine-wide duration estimate.
    pub fn estimate_timeline(summary: &DiffSummary) -> &'static str {
        if summary.breaking > 5 {
            "4-8 weeks"
        } else if summary.breaking > 0 || summary.major > 10 {
            "2-4 weeks"
        } else if summary.major > 0 {
            "1-2 weeks"
        } else {
            "1-3 days"
        }
    }

    /// Free-text risk assessment.
    pub fn assess_risk(summary: &DiffSummary) -> String {
        if summary.breaking > 3 {
            format!(
                "High risk: {} breaking changes. Use a gradual migration with a versioned rollout \
                 and keep the old schema readable until every consumer has moved.",
                summary.breaking
            )
        } else if summary.breaking > 0 {
            format!(
                "Medium risk: {} breaking change(s). Plan the rollout carefully and coordinate \
                 with every consumer of the affected fields.",
                summary.breaking
            )
        } else if summary.major > 5 {
            format!(
                "Medium risk: {} major changes. Test thoroughly against production-like data \
                 before deploying.",
                summary.major
            )
        } else {
            "Low risk: changes are backward compatible.".to_string()
        }
    }

    fn direct(changes: &[Change]) -> MigrationStrategy {
        let mut phases = PhaseCounter::new();
        let apply = MigrationStep::new(
            "direct-apply",
            phases.next(),
            "apply_all_changes",
            format!("Apply all {} change(s) in a single deployment", changes.len()),
        )
        .with_validation("Run the existing test suite against the new schema")
        .with_rollback("Redeploy the previous schema version");

        MigrationStrategy {
            name: "Direct Migration".to_string(),
            description: "Apply the changes in one step; they are backward compatible"
                .to_string(),
            risk: Risk::Low,
            timeline: "1 day".to_string(),
            steps: vec![apply],
            rollback_plan: Some(
                "Redeploy the previous schema version; no stored data is transformed".to_string(),
            ),
        }
    }

    fn gradual(changes: &[Change]) -> MigrationStrategy {
        let added = paths_of(changes, ChangeType::Added);
        let removed = paths_of(changes, ChangeType::Removed);

        let mut phases = PhaseCounter::new();
        let mut steps = Vec::new();

        let add_step = if added.is_empty() {
            None
        } else {
            Some(
                MigrationStep::new(
                    "gradual-add-fields",
                    phases.next(),
                    "add_new_fields",
                    format!(
                        "Add {} new field(s) as optional so existing writers keep working: {}",
                        added.len(),
                        added.join(", ")
                    ),
                )
                .with_validation("Existing readers and writers accept records without the new fields")
                .with_rollback("Drop the newly added fields; no existing data depends on them"),
            )
        };

        let mut migrate = MigrationStep::new(
            "gradual-migrate-data",
            phases.next(),
            "migrate_data",
            format!(
                "Backfill and transform existing records for {} change(s)",
                changes.len()
            ),
        )
        .with_validation("Every migrated record validates against the new schema")
        .with_rollback("Restore affected records from the pre-migration snapshot");
        if let Some(add) = &add_step {
            migrate = migrate.after(add);
        }

        let remove_step = if removed.is_empty() {
            None
        } else {
            Some(
                MigrationStep::new(
                    "gradual-remove-deprecated",
                    phases.next(),
                    "remove_deprecated_fields",
                    format!(
                        "Remove {} deprecated field(s) once no consumer reads them: {}",
                        removed.len(),
                        removed.join(", ")
                    ),
                )
                .with_validation("No reads of the removed fields are observed for a full release cycle")
                .with_rollback("Re-add the removed fields and restore their values from backup")
                .after(&migrate),
            )
        };

        steps.extend(add_step);
        steps.push(migrate);
        steps.extend(remove_step);

        MigrationStrategy {
            name: "Gradual Migration".to_string(),
            description: "Expand the schema, migrate data, then contract in separate releases"
                .to_string(),
            risk: Risk::Medium,
            timeline: "2-3 weeks".to_string(),
            steps,
            rollback_plan: Some(
                "Each phase ships separately; revert the most recent phase and restore its \
                 snapshot"
                    .to_string(),
            ),
        }
    }

    fn blue_green(changes: &[Change]) -> MigrationStrategy {
        let mut phases = PhaseCounter::new();

        let deploy = MigrationStep::new(
            "blue-green-deploy",
            phases.next(),
            "deploy_new_schema",
            "Deploy the new schema to an idle (green) environment alongside the live (blue) one",
        )
        .with_validation("The green environment passes health checks and smoke tests")
        .with_rollback("Tear down the green environment");

        let migrate = MigrationStep::new(
            "blue-green-migrate",
            phases.next(),
            "migrate_data",
            format!(
                "Copy and transform data into the green environment for {} change(s)",
                changes.len()
            ),
        )
        .with_validation("Record counts and checksums match between blue and green")
        .with_rollback("Discard the green data set")
        .after(&deploy);

        let switch = MigrationStep::new(
            "blue-green-switch",
            phases.next(),
            "switch_traffic",
            "Route traffic from blue to green",
        )
        .with_validation("Error rates and latency on green stay at the blue baseline")
        .with_rollback("Route traffic back to blue")
        .after(&migrate);

        MigrationStrategy {
            name: "Blue-Green Migration".to_string(),
            description: "Run old and new schemas side by side and switch traffic at once"
                .to_string(),
            risk: Risk::Low,
            timeline: "1-2 weeks".to_string(),
            steps: vec![deploy, migrate, switch],
            rollback_plan: Some(
                "Keep blue running until green is proven; switching back is a routing change"
                    .to_string(),
            ),
        }
    }

    fn version_based(summary: &DiffSummary) -> MigrationStrategy {
        let mut phases = PhaseCounter::new();

        let create = MigrationStep::new(
            "version-create",
            phases.next(),
            "create_new_version",
            format!(
                "Publish the new schema as a separate version covering {} breaking change(s)",
                summary.breaking
            ),
        )
        .with_validation("Both schema versions are served and independently addressable")
        .with_rollback("Unpublish the new version");

        let adapters = MigrationStep::new(
            "version-adapters",
            phases.next(),
            "implement_adapters",
            "Implement adapters converting records between the old and new versions",
        )
        .with_validation("Round-tripping sample records through the adapters is lossless")
        .with_rollback("Remove the adapters; consumers stay on the old version")
        .after(&create);

        let adoption = MigrationStep::new(
            "version-adoption",
            phases.next(),
            "gradual_adoption",
            "Move consumers to the new version one at a time, then retire the old version",
        )
        .with_validation("Usage of the old version drops to zero before it is retired")
        .with_rollback("Point consumers back at the old version")
        .after(&adapters);

        MigrationStrategy {
            name: "Version-Based Migration".to_string(),
            description: "Serve both schema versions behind adapters while consumers migrate"
                .to_string(),
            risk: Risk::High,
            timeline: "4-6 weeks".to_string(),
            steps: vec![create, adapters, adoption],
            rollback_plan: Some(
                "The old version stays available until retirement; consumers can return to it"
                    .to_string(),
            ),
        }
    }
}

fn paths_of(changes: &[Change], change_type: ChangeType) -> Vec<&str> {
    changes
        .iter()
        .filter(|c| c.change_type == change_type)
        .map(|c| display_path(&c.path))
        .collect()
}
