//! Change records produced by the detector.

use super::impact::{ImpactClassifier, ImpactLevel};
use crate::schema::NodeKind;
use serde::{Deserialize, Serialize};

/// Kind of difference, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Field present only in the new schema.
    Added,
    /// Field present only in the old schema.
    Removed,
    /// Field present in both with a different shape.
    Modified,
    /// Field relocated within the tree. Reserved; never emitted.
    Moved,
    /// Removed and added field judged to be the same field.
    Renamed,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Added => write!(f, "ADDED"),
            ChangeType::Removed => write!(f, "REMOVED"),
            ChangeType::Modified => write!(f, "MODIFIED"),
            ChangeType::Moved => write!(f, "MOVED"),
            ChangeType::Renamed => write!(f, "RENAMED"),
        }
    }
}

/// What exactly changed. This is the input to impact classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeKind {
    /// Field added.
    Added {
        /// Whether the new field is optional.
        optional: bool,
    },
    /// Field removed.
    Removed,
    /// Array element changed to a dissimilar kind.
    ArrayElementChanged {
        /// Old element kind.
        from: NodeKind,
        /// New element kind.
        to: NodeKind,
    },
    /// Node changed kind, or leaf changed primitive tag.
    TypeChanged {
        /// Old kind.
        from: NodeKind,
        /// New kind.
        to: NodeKind,
        /// Was optional before.
        from_optional: bool,
        /// Is optional now.
        to_optional: bool,
    },
    /// Node became optional or required.
    OptionalityChanged {
        /// Was optional before.
        from_optional: bool,
        /// Is optional now.
        to_optional: bool,
    },
    /// Field renamed.
    Renamed {
        /// Path of the field in the new schema.
        new_path: String,
        /// Name similarity score in `(0.7, 1.0]`.
        confidence: f64,
    },
}

impl ChangeKind {
    /// Reported change type.
    pub fn change_type(&self) -> ChangeType {
        match self {
            ChangeKind::Added { .. } => ChangeType::Added,
            ChangeKind::Removed => ChangeType::Removed,
            ChangeKind::ArrayElementChanged { .. }
            | ChangeKind::TypeChanged { .. }
            | ChangeKind::OptionalityChanged { .. } => ChangeType::Modified,
            ChangeKind::Renamed { .. } => ChangeType::Renamed,
        }
    }
}

/// A single difference between two schemas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Stable key derived from the change type and path.
    pub id: String,
    /// Reported change type.
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Dot-path of the affected node. Array elements end in `[]`.
    pub path: String,
    /// Previous value: a type description, or the old name for renames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// New value: a type description, or the new name for renames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    /// Compatibility impact.
    pub impact: ImpactLevel,
    /// Human-readable summary.
    pub description: String,
    /// What the caller should check or do.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Data migration hint, filled when migration generation is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<String>,
    /// Rename confidence score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Detailed change kind.
    #[serde(skip)]
    pub kind: ChangeKind,
}

impl Change {
    /// Create a change; type, id and impact are derived from `kind`.
    pub fn new(kind: ChangeKind, path: impl Into<String>, description: impl Into<String>) -> Self {
        let path = path.into();
        let change_type = kind.change_type();
        let id = match &kind {
            ChangeKind::Renamed { new_path, .. } => format!("renamed:{}->{}", path, new_path),
            _ => format!("{}:{}", change_type.to_string().to_lowercase(), path),
        };
        let confidence = match &kind {
            ChangeKind::Renamed { confidence, .. } => Some(*confidence),
            _ => None,
        };

        Self {
            id,
            change_type,
            impact: ImpactClassifier::classify(&kind),
            path,
            old_value: None,
            new_value: None,
            description: description.into(),
            suggestion: None,
            migration: None,
            confidence,
            kind,
        }
    }

    /// Set the before/after values.
    pub fn with_values(mut self, old_value: Option<String>, new_value: Option<String>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Check if this change is breaking.
    pub fn is_breaking(&self) -> bool {
        self.impact == ImpactLevel::Breaking
    }

    /// Describe the data operation needed to carry existing records across
    /// this change.
    pub fn migration_hint(&self) -> String {
        let path = display_path(&self.path);
        match &self.kind {
            ChangeKind::Added { optional: true } => {
                format!("No data migration needed; existing records simply omit '{}'", path)
            }
            ChangeKind::Added { optional: false } => format!(
                "Backfill '{}' for every existing record before enforcing the new schema",
                path
            ),
            ChangeKind::Removed => format!(
                "Stop writing '{}', then drop it from stored records once no reader depends on it",
                path
            ),
            ChangeKind::ArrayElementChanged { from, to } => format!(
                "Convert every element of '{}' from {} to {}",
                path, from, to
            ),
            ChangeKind::TypeChanged {
                from,
                to,
                from_optional: true,
                to_optional: false,
            } => format!(
                "Convert existing values of '{}' from {} to {} and backfill records that lack it",
                path, from, to
            ),
            ChangeKind::TypeChanged { from, to, .. } => format!(
                "Convert existing values of '{}' from {} to {}",
                path, from, to
            ),
            ChangeKind::OptionalityChanged {
                to_optional: false, ..
            } => format!(
                "Backfill missing values of '{}' before making it required",
                path
            ),
            ChangeKind::OptionalityChanged {
                to_optional: true, ..
            } => format!("No data migration needed; '{}' becomes optional", path),
            ChangeKind::Renamed { new_path, .. } => format!(
                "Copy '{}' into '{}' for existing records, then drop '{}'",
                path,
                display_path(new_path),
                path
            ),
        }
    }
}

/// Render a change path for messages; the root path is empty.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
