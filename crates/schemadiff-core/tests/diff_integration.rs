//! Integration tests for the diff engine.

use pretty_assertions::assert_eq;
use schemadiff_core::migration::{similarity, RENAME_THRESHOLD};
use schemadiff_core::{
    diff, ChangeType, Compatibility, DiffError, DiffOptions, DiffResult, ImpactLevel, Risk,
    SchemaDef, SchemaTree,
};
use std::collections::HashSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn user_v1() -> SchemaDef {
    SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("name", SchemaDef::string())
        .with_field("email", SchemaDef::string())
        .with_field("age", SchemaDef::integer().optional())
        .with_field(
            "address",
            SchemaDef::object()
                .with_field("street", SchemaDef::string())
                .with_field("city", SchemaDef::string()),
        )
        .with_field("tags", SchemaDef::array(SchemaDef::string()))
}

fn user_v2() -> SchemaDef {
    SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("name", SchemaDef::string())
        .with_field("age", SchemaDef::integer())
        .with_field(
            "address",
            SchemaDef::object()
                .with_field("street", SchemaDef::string())
                .with_field("city", SchemaDef::string())
                .with_field("zip", SchemaDef::string().optional()),
        )
        .with_field("tags", SchemaDef::array(SchemaDef::number()))
        .with_field("createdAt", SchemaDef::date())
}

fn summary(result: &DiffResult) -> Vec<(ChangeType, &str, ImpactLevel)> {
    result
        .changes
        .iter()
        .map(|c| (c.change_type, c.path.as_str(), c.impact))
        .collect()
}

fn strategy_names(result: &DiffResult) -> Vec<&str> {
    result
        .migration_strategies
        .iter()
        .map(|s| s.name.as_str())
        .collect()
}

#[test]
fn test_identical_schema_is_empty() {
    init_tracing();
    let tree = user_v1().to_tree();

    let result = diff(&tree, &tree, &DiffOptions::full()).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.compatibility, Compatibility::Compatible);
    assert_eq!(strategy_names(&result), vec!["Direct Migration"]);
}

#[test]
fn test_full_user_migration() {
    init_tracing();
    let old = user_v1().to_tree();
    let new = user_v2().to_tree();

    let result = diff(&old, &new, &DiffOptions::full()).unwrap();

    assert_eq!(
        summary(&result),
        vec![
            (ChangeType::Added, ".createdAt", ImpactLevel::Major),
            (ChangeType::Removed, ".email", ImpactLevel::Breaking),
            (ChangeType::Modified, ".age", ImpactLevel::Breaking),
            (ChangeType::Added, ".address.zip", ImpactLevel::Minor),
            (ChangeType::Modified, ".tags[]", ImpactLevel::Breaking),
        ]
    );
    assert_eq!(result.summary.breaking, 3);
    assert_eq!(result.summary.major, 1);
    assert_eq!(result.summary.minor, 1);
    assert_eq!(result.summary.total, 5);
    assert_eq!(result.compatibility, Compatibility::Breaking);
    assert_eq!(result.timeline, "2-4 weeks");
    assert!(result.risk_assessment.starts_with("Medium risk: 3 breaking"));
    assert!(result.changes.iter().all(|c| c.migration.is_some()));
}

#[test]
fn test_symmetry_without_renames() {
    let a = user_v1().to_tree();
    let b = user_v2().to_tree();
    let options = DiffOptions::new().with_renames(false);

    let forward = diff(&a, &b, &options).unwrap();
    let backward = diff(&b, &a, &options).unwrap();

    let added: HashSet<_> = forward
        .changes_of_type(ChangeType::Added)
        .into_iter()
        .map(|c| c.path.clone())
        .collect();
    let removed: HashSet<_> = backward
        .changes_of_type(ChangeType::Removed)
        .into_iter()
        .map(|c| c.path.clone())
        .collect();
    assert_eq!(added, removed);

    let removed: HashSet<_> = forward
        .changes_of_type(ChangeType::Removed)
        .into_iter()
        .map(|c| c.path.clone())
        .collect();
    let added: HashSet<_> = backward
        .changes_of_type(ChangeType::Added)
        .into_iter()
        .map(|c| c.path.clone())
        .collect();
    assert_eq!(added, removed);
}

#[test]
fn test_rename_boundary() {
    assert!(similarity("email", "emial") <= RENAME_THRESHOLD);
    assert!(similarity("email", "emaill") > RENAME_THRESHOLD);

    let old = SchemaDef::object().with_field("email", SchemaDef::string()).to_tree();
    let typo = SchemaDef::object().with_field("emial", SchemaDef::string()).to_tree();
    let close = SchemaDef::object().with_field("emaill", SchemaDef::string()).to_tree();

    let result = diff(&old, &typo, &DiffOptions::default()).unwrap();
    assert!(result.changes_of_type(ChangeType::Renamed).is_empty());
    assert_eq!(result.summary.total, 2);

    let result = diff(&old, &close, &DiffOptions::default()).unwrap();
    assert_eq!(
        summary(&result),
        vec![(ChangeType::Renamed, ".email", ImpactLevel::Major)]
    );
}

#[test]
fn test_removing_required_field_is_breaking_for_any_type() {
    let field_types = [
        SchemaDef::string(),
        SchemaDef::number(),
        SchemaDef::boolean(),
        SchemaDef::date(),
        SchemaDef::array(SchemaDef::string()),
        SchemaDef::object().with_field("inner", SchemaDef::string()),
    ];

    for field in field_types {
        let old = SchemaDef::object()
            .with_field("id", SchemaDef::string())
            .with_field("payload", field)
            .to_tree();
        let new = SchemaDef::object().with_field("id", SchemaDef::string()).to_tree();

        let result = diff(&old, &new, &DiffOptions::default()).unwrap();
        assert_eq!(
            summary(&result),
            vec![(ChangeType::Removed, ".payload", ImpactLevel::Breaking)]
        );
    }
}

#[test]
fn test_strategy_composition() {
    let base = SchemaDef::object().with_field("id", SchemaDef::string());

    let removal = diff(
        &base.clone().with_field("legacy", SchemaDef::string()).to_tree(),
        &base.to_tree(),
        &DiffOptions::new().with_strategies(true),
    )
    .unwrap();
    assert_eq!(
        strategy_names(&removal),
        vec!["Gradual Migration", "Blue-Green Migration", "Version-Based Migration"]
    );

    let optional_addition = diff(
        &base.to_tree(),
        &base
            .clone()
            .with_field("nickname", SchemaDef::string().optional())
            .to_tree(),
        &DiffOptions::new().with_strategies(true),
    )
    .unwrap();
    assert_eq!(strategy_names(&optional_addition), vec!["Direct Migration"]);
    assert_eq!(optional_addition.migration_strategies[0].risk, Risk::Low);
}

#[test]
fn test_steps_are_well_ordered() {
    let result = diff(
        &user_v1().to_tree(),
        &user_v2().to_tree(),
        &DiffOptions::full(),
    )
    .unwrap();

    for strategy in &result.migration_strategies {
        let mut seen = HashSet::new();
        let mut phase = 1;
        for step in &strategy.steps {
            assert!(step.phase >= phase, "{}: phase went backwards", strategy.name);
            phase = step.phase;
            assert!(step
                .dependencies
                .iter()
                .all(|dep| seen.contains(dep.as_str())));
            seen.insert(step.id.as_str());
        }
    }
}

#[test]
fn test_unrelated_rename_stays_add_and_remove() {
    // name -> fullName scores 0.375, well below the threshold.
    let old = SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("name", SchemaDef::string())
        .to_tree();
    let new = SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("fullName", SchemaDef::string())
        .to_tree();

    let result = diff(&old, &new, &DiffOptions::new().with_strategies(true)).unwrap();

    assert_eq!(
        summary(&result),
        vec![
            (ChangeType::Added, ".fullName", ImpactLevel::Major),
            (ChangeType::Removed, ".name", ImpactLevel::Breaking),
        ]
    );
    assert_eq!(result.compatibility, Compatibility::Breaking);
    assert_eq!(result.migration_strategies.len(), 3);
}

#[test]
fn test_end_to_end_rename() {
    init_tracing();
    let old = SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("fullname", SchemaDef::string())
        .to_tree();
    let new = SchemaDef::object()
        .with_field("id", SchemaDef::string())
        .with_field("fullName", SchemaDef::string())
        .to_tree();

    let result = diff(&old, &new, &DiffOptions::full()).unwrap();

    assert_eq!(
        summary(&result),
        vec![(ChangeType::Renamed, ".fullname", ImpactLevel::Major)]
    );
    let rename = &result.changes[0];
    assert_eq!(rename.id, "renamed:.fullname->.fullName");
    assert_eq!(rename.old_value.as_deref(), Some("fullname"));
    assert_eq!(rename.new_value.as_deref(), Some("fullName"));
    assert_eq!(rename.confidence, Some(0.875));
    assert!(rename.description.contains("88% confidence"));
    assert!(rename.suggestion.is_some());

    assert_eq!(result.compatibility, Compatibility::Risky);
    assert_eq!(result.timeline, "1-2 weeks");
    assert_eq!(
        strategy_names(&result),
        vec!["Gradual Migration", "Blue-Green Migration"]
    );

    // Renames are neither additions nor removals for the gradual plan.
    let gradual = &result.migration_strategies[0];
    let actions: Vec<_> = gradual.steps.iter().map(|s| s.action.as_str()).collect();
    assert_eq!(actions, vec!["migrate_data"]);
}

#[test]
fn test_cycle_is_rejected() {
    let mut cyclic = SchemaTree::new();
    let root = cyclic.object();
    let child = cyclic.object();
    cyclic.add_field(root, "parent", child);
    cyclic.add_field(child, "back", root);
    cyclic.set_root(root);

    let shared = SchemaDef::object()
        .with_field(
            "parent",
            SchemaDef::object().with_field("back", SchemaDef::object()),
        )
        .to_tree();
    let plain = SchemaDef::object()
        .with_field("parent", SchemaDef::object())
        .to_tree();

    let empty = SchemaDef::object().to_tree();
    let absent = SchemaTree::new();

    // Rejected whether the cycle sits under shared or one-sided fields.
    for other in [&shared, &plain, &empty, &absent] {
        let err = diff(&cyclic, other, &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, DiffError::CyclicSchema { .. }));
        assert_eq!(err.path(), ".parent.back");
        assert!(err.to_string().contains(".parent.back"));

        let err = diff(other, &cyclic, &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, DiffError::CyclicSchema { .. }));
    }
}

#[test]
fn test_malformed_added_subtree_is_rejected() {
    let mut new = SchemaTree::new();
    let opaque = new.unknown("ZodEffects");
    let wrap = new.object_with([("meta", opaque)]);
    let root = new.object_with([("wrap", wrap)]);
    new.set_root(root);

    let err = diff(&SchemaDef::object().to_tree(), &new, &DiffOptions::default()).unwrap_err();
    assert!(matches!(err, DiffError::MalformedNode { .. }));
    assert_eq!(err.path(), ".wrap.meta");
}

#[test]
fn test_widening_retype_to_required_is_breaking() {
    let old = SchemaDef::object()
        .with_field("count", SchemaDef::integer().optional())
        .to_tree();
    let new = SchemaDef::object().with_field("count", SchemaDef::number()).to_tree();

    let result = diff(&old, &new, &DiffOptions::full()).unwrap();

    assert_eq!(
        summary(&result),
        vec![(ChangeType::Modified, ".count", ImpactLevel::Breaking)]
    );
    assert_eq!(result.compatibility, Compatibility::Breaking);
    assert_eq!(result.migration_strategies.len(), 3);
    assert_eq!(
        result.changes[0].migration.as_deref(),
        Some("Convert existing values of '.count' from integer to number and backfill records that lack it")
    );
}

#[test]
fn test_moved_and_patch_never_emitted() {
    let result = diff(
        &user_v1().to_tree(),
        &user_v2().to_tree(),
        &DiffOptions::full(),
    )
    .unwrap();

    assert!(result.changes_of_type(ChangeType::Moved).is_empty());
    assert_eq!(result.summary.patch, 0);
}

#[test]
fn test_schema_from_json() {
    let old: SchemaDef = serde_json::from_str(
        r#"{
            "type": "object",
            "fields": [
                {"name": "id", "schema": {"type": "leaf", "primitive": "string"}},
                {"name": "count", "schema": {"type": "leaf", "primitive": "integer"}}
            ]
        }"#,
    )
    .unwrap();
    let new: SchemaDef = serde_json::from_str(
        r#"{
            "type": "object",
            "fields": [
                {"name": "id", "schema": {"type": "leaf", "primitive": "string"}},
                {"name": "count", "schema": {"type": "leaf", "primitive": "number"}}
            ]
        }"#,
    )
    .unwrap();
    let options: DiffOptions =
        serde_json::from_str(r#"{"detectRenames": false, "generateMigration": true}"#).unwrap();

    let result = diff(&old.to_tree(), &new.to_tree(), &options).unwrap();

    // integer widens to number, so the change is not breaking
    assert_eq!(
        summary(&result),
        vec![(ChangeType::Modified, ".count", ImpactLevel::Major)]
    );
    assert_eq!(
        result.changes[0].migration.as_deref(),
        Some("Convert existing values of '.count' from integer to number")
    );
    assert!(result.migration_strategies.is_empty());
}

#[test]
fn test_result_json_shape() {
    let result = diff(
        &user_v1().to_tree(),
        &user_v2().to_tree(),
        &DiffOptions::full(),
    )
    .unwrap();

    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(value["compatibility"], "breaking");
    assert_eq!(value["timeline"], "2-4 weeks");
    assert_eq!(value["summary"]["total"], 5);
    assert_eq!(value["changes"][1]["type"], "REMOVED");
    assert_eq!(value["changes"][1]["impact"], "BREAKING");
    assert_eq!(value["changes"][1]["oldValue"], "string");
    assert_eq!(value["migrationStrategies"][0]["name"], "Gradual Migration");
    assert_eq!(value["migrationStrategies"][0]["steps"][0]["phase"], 1);
    assert_eq!(
        value["migrationStrategies"][0]["steps"][1]["dependencies"][0],
        "gradual-add-fields"
    );
}

#[test]
fn test_change_paths_resolve() {
    let old = user_v1().to_tree();
    let new = user_v2().to_tree();

    let result = diff(&old, &new, &DiffOptions::default()).unwrap();

    for change in &result.changes {
        let in_old = old.resolve(&change.path).is_some();
        let in_new = new.resolve(&change.path).is_some();
        match change.change_type {
            ChangeType::Added => assert!(in_new && !in_old, "{}", change.path),
            ChangeType::Removed | ChangeType::Renamed => assert!(in_old, "{}", change.path),
            ChangeType::Modified => assert!(in_old && in_new, "{}", change.path),
            ChangeType::Moved => unreachable!("moves are never reported"),
        }
    }
}
