//! Tests for design file parsing across the four dialects

use cabscan::{parse_design_file, Dialect, ParameterValue};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_parse_cab_fixture() {
    let result = parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");

    assert_eq!(result.dialect, Dialect::LineA);
    assert_eq!(result.parts.len(), 2);
    assert_eq!(result.parts[0].name, "base_unit");
    assert_eq!(result.parts[1].name, "wall_unit");
    assert!(result
        .parts
        .iter()
        .all(|p| p.part_type == "cabinet_part"));
}

#[test]
fn test_parse_des_fixture() {
    let result = parse_design_file(&fixture_path("wardrobe.des")).expect("should parse");

    assert_eq!(result.dialect, Dialect::LineB);
    assert_eq!(result.parts.len(), 2);
    // Family B records constraints at top level, not on parts
    assert!(result.parts.iter().all(|p| p.constraints.is_empty()));
    assert_eq!(result.constraints.len(), 1);
    assert_eq!((result.version.major, result.version.minor), (1, 4));
}

#[test]
fn test_parse_model_fixture() {
    let result = parse_design_file(&fixture_path("shelf_model.mzb")).expect("should parse");

    assert_eq!(result.dialect, Dialect::Model);
    assert_eq!(result.parts.len(), 1);
    assert_eq!(result.parts[0].part_type, "model_block");
    let buckets: Vec<_> = result.parts[0]
        .parameters
        .iter()
        .filter(|p| p.bucket.is_some())
        .collect();
    assert_eq!(buckets.len(), 4);
    assert_eq!(result.version.version, "3.0.2");
}

#[test]
fn test_parse_markup_fixture() {
    let result = parse_design_file(&fixture_path("broken_design.xml")).expect("should parse");

    assert_eq!(result.dialect, Dialect::Markup);
    assert_eq!(result.parts.len(), 2);
    assert!(result.errors.is_empty(), "fixture is well-formed");
    // Section tree mirrors the document structure
    assert_eq!(result.sections.len(), 1);
    assert_eq!(result.sections[0].name, "design");
    assert_eq!(result.sections[0].children.len(), 2);
}

#[test]
fn test_markup_value_attribute_yields_typed_parameter() {
    let result = parse_design_file(&fixture_path("broken_design.xml")).expect("should parse");

    let width = result
        .parameters
        .iter()
        .find(|p| p.name == "width")
        .expect("width parameter");
    assert_eq!(width.value, ParameterValue::Number(450.0));
    assert_eq!(width.unit.as_deref(), Some("mm"));

    let hinge_count = result
        .parameters
        .iter()
        .find(|p| p.name == "hinge_count")
        .expect("hinge_count parameter");
    assert_eq!(hinge_count.value, ParameterValue::Number(2.0));
}

#[test]
fn test_parse_nonexistent_file_fails() {
    let result = parse_design_file(&PathBuf::from("not_a_real_file.cab"));
    assert!(result.is_err(), "should fail on nonexistent file");
}

#[test]
fn test_parse_is_idempotent() {
    let first = parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");
    let second = parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");

    // Identifiers are freshly generated per parse, but names, values and
    // types must match exactly.
    assert_eq!(first.parts.len(), second.parts.len());
    for (a, b) in first.parts.iter().zip(second.parts.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.part_type, b.part_type);
        assert_eq!(a.parameters.len(), b.parameters.len());
        for (pa, pb) in a.parameters.iter().zip(b.parameters.iter()) {
            assert_eq!(pa.name, pb.name);
            assert_eq!(pa.value, pb.value);
            assert_eq!(pa.unit, pb.unit);
        }
    }
    assert_eq!(first.statistics.total_constraints, second.statistics.total_constraints);
}

#[test]
fn test_dependency_extracted_from_reference_value() {
    let result = parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");

    assert_eq!(result.dependencies.len(), 1);
    assert_eq!(result.dependencies[0].to, "base_unit");
    let back_offset = result
        .parameters
        .iter()
        .find(|p| p.name == "back_offset")
        .expect("back_offset parameter");
    assert_eq!(result.dependencies[0].from, back_offset.id);
}
