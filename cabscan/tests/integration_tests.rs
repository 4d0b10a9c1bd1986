//! Integration tests for the CabScan library

use cabscan::prelude::*;
use cabscan::{detect_format, discover_design_files, DependencyGraph};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_end_to_end_valid_design() {
    let result =
        cabscan::parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");

    assert_eq!(result.statistics.broken_logic_count, 0);
    assert!(result.errors.is_empty());
    assert_eq!(result.version.version, "2.1.3");
    assert!(result.statistics.file_size > 0);
    assert!(result.statistics.processing_time_ms >= 0.0);
}

#[test]
fn test_result_serializes_to_json() {
    let result =
        cabscan::parse_design_file(&fixture_path("broken_design.xml")).expect("should parse");

    let json = serde_json::to_string(&result).expect("should serialize");
    assert!(json.contains("\"statistics\""));
    assert!(json.contains("\"missing_parameter\""));

    let roundtrip: ParseResult = serde_json::from_str(&json).expect("should deserialize");
    assert_eq!(roundtrip.statistics, result.statistics);
    assert_eq!(roundtrip.parts, result.parts);
}

#[test]
fn test_detect_format_before_parsing() {
    assert_eq!(detect_format("a.cab", ""), Dialect::LineA);
    assert_eq!(detect_format("a.weird", "DES_PART p"), Dialect::LineB);
}

#[test]
fn test_dependency_graph_from_result() {
    let result =
        cabscan::parse_design_file(&fixture_path("valid_kitchen.cab")).expect("should parse");

    let graph = DependencyGraph::from_dependencies(&result.dependencies);
    assert_eq!(graph.edge_count(), 1);
    assert!(!graph.is_cyclic());
    assert_eq!(graph.dependents_of("base_unit").len(), 1);
}

#[test]
fn test_discover_design_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.cab"), "CAB_PART p\nw = 1\n").unwrap();
    std::fs::write(dir.path().join("b.xml"), "<design/>").unwrap();
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    let nested = dir.path().join("sub");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(nested.join("c.mzb"), "MZB_BLOCK b\nvar_x = 1\n").unwrap();

    let mut files = discover_design_files(dir.path()).expect("should walk");
    files.sort();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.cab", "b.xml", "c.mzb"]);
}

#[test]
fn test_concurrent_invocations_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let input = format!("CAB_PART part_{i}\nwidth = {i}\n");
                CabScanCore::parse(input.as_bytes(), "t.cab").expect("should parse")
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().expect("no panic");
        assert_eq!(result.parts[0].name, format!("part_{i}"));
    }
}
