//! Impact classification for schema changes.
//!
//! Every change gets exactly one [`ImpactLevel`] from a fixed rule table,
//! evaluated in order:
//!
//! | # | Change | Impact |
//! |---|--------|--------|
//! | 1 | Field removed | BREAKING |
//! | 2 | Field added | MINOR if optional, else MAJOR |
//! | 3 | Array element type changed | BREAKING |
//! | 4 | Leaf retyped between non-coercible primitives | BREAKING |
//! | 5 | Optional → required, with or without a retype | BREAKING |
//! | 6 | Required → optional | MINOR |
//! | 7 | Field renamed | MAJOR |
//! | 8 | Anything else | MAJOR |
//!
//! PATCH is reserved for no-op-equivalent changes and is never assigned.

use super::change::ChangeKind;
use crate::schema::NodeKind;
use serde::{Deserialize, Serialize};

/// Compatibility impact of a change. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    /// No observable effect.
    Patch,
    /// Backward compatible addition or relaxation.
    Minor,
    /// Compatible in principle, but consumers must adapt.
    Major,
    /// Existing data or consumers break.
    Breaking,
}

impl ImpactLevel {
    /// All levels, most severe first.
    pub const ALL: [ImpactLevel; 4] = [
        ImpactLevel::Breaking,
        ImpactLevel::Major,
        ImpactLevel::Minor,
        ImpactLevel::Patch,
    ];
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactLevel::Breaking => write!(f, "BREAKING"),
            ImpactLevel::Major => write!(f, "MAJOR"),
            ImpactLevel::Minor => write!(f, "MINOR"),
            ImpactLevel::Patch => write!(f, "PATCH"),
        }
    }
}

/// Assigns impact levels to changes.
pub struct ImpactClassifier;

impl ImpactClassifier {
    /// Classify a change by its kind.
    pub fn classify(kind: &ChangeKind) -> ImpactLevel {
        match kind {
            ChangeKind::Removed => ImpactLevel::Breaking,

            ChangeKind::Added { optional: true } => ImpactLevel::Minor,
            ChangeKind::Added { optional: false } => ImpactLevel::Major,

            ChangeKind::ArrayElementChanged { .. } => ImpactLevel::Breaking,

            ChangeKind::TypeChanged {
                from: NodeKind::Leaf(from),
                to: NodeKind::Leaf(to),
                ..
            } if !from.coerces_to(to) => ImpactLevel::Breaking,

            // A retype does not hide a required-ness tightening.
            ChangeKind::OptionalityChanged {
                from_optional: true,
                to_optional: false,
            }
            | ChangeKind::TypeChanged {
                from_optional: true,
                to_optional: false,
                ..
            } => ImpactLevel::Breaking,
            ChangeKind::OptionalityChanged {
                from_optional: false,
                to_optional: true,
            } => ImpactLevel::Minor,

            ChangeKind::Renamed { .. } => ImpactLevel::Major,

            // Coercible retypes, kind changes and anything unforeseen.
            _ => ImpactLevel::Major,
        }
    }
}
