//! Rename detection.
//!
//! A structural diff sees a renamed field as one removal plus one addition.
//! This heuristic pairs removed and added fields of the same level whose
//! nodes are similar and whose names are close in edit distance, and reports
//! each such pair as a single rename.
//!
//! Scoring is O(n·m) per name pair and every removed/added pair of a level is
//! scored, so a level with `r` removals and `a` additions costs `r·a` edit
//! distance computations. Schemas have tens of fields per level, which keeps
//! this cheap in practice.
//!
//! Ambiguity is not resolved: if one removed field scores above the threshold
//! against several added fields (or the other way round), every qualifying
//! pair is reported.

use super::change::{Change, ChangeKind};
use crate::schema::classify;
use crate::schema::SchemaNode;
use tracing::trace;

/// Similarity a name pair must exceed to be reported as a rename.
pub const RENAME_THRESHOLD: f64 = 0.7;

/// Pair removed and added fields of one object level into renames.
///
/// `path` is the path of the object that holds the fields. Pairs are visited
/// with removed fields in old-schema order and, for each, added fields in
/// new-schema order.
pub fn detect_renames(
    removed: &[(&str, &SchemaNode)],
    added: &[(&str, &SchemaNode)],
    path: &str,
) -> Vec<Change> {
    let mut renames = Vec::new();

    for (old_name, old_node) in removed {
        for (new_name, new_node) in added {
            if !classify::similar(old_node, new_node) {
                continue;
            }

            let confidence = similarity(old_name, new_name);
            trace!(
                path,
                from = *old_name,
                to = *new_name,
                confidence,
                "scored rename candidate"
            );
            if confidence <= RENAME_THRESHOLD {
                continue;
            }

            let old_path = format!("{}.{}", path, old_name);
            let new_path = format!("{}.{}", path, new_name);
            let percent = (confidence * 100.0).round() as u32;

            renames.push(
                Change::new(
                    ChangeKind::Renamed {
                        new_path: new_path.clone(),
                        confidence,
                    },
                    old_path.clone(),
                    format!(
                        "Field '{}' appears to be renamed to '{}' ({}% confidence)",
                        old_name, new_name, percent
                    ),
                )
                .with_values(Some(old_name.to_string()), Some(new_name.to_string()))
                .with_suggestion(format!(
                    "Verify that '{}' was renamed to '{}' rather than replaced by an unrelated field",
                    old_path, new_path
                )),
            );
        }
    }

    renames
}

/// Normalized name similarity in `[0.0, 1.0]`:
/// `(max_len - levenshtein(a, b)) / max_len`, and `1.0` for two empty names.
///
/// Lengths are counted in chars.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    (max_len - levenshtein(a, b)) as f64 / max_len as f64
}

/// Levenshtein edit distance over chars, with unit costs for insertion,
/// deletion and substitution.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two rows of the full matrix are enough.
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
