//! Example: run the detector with tuned severities (without CabScanCore).
//! Run with: cargo run --example broken_logic_report [path/to/file.xml]

use cabscan::{BrokenLogicDetector, DetectorConfig, FindingSeverity};
use cabscan::parser::{detect_format, Dialect, LineParser, MarkupParser, ModelParser, CAB_DIALECT, DES_DIALECT};
use std::path::Path;

fn main() -> std::io::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/broken_design.xml".to_string());
    let path = Path::new(&path);
    let content = std::fs::read_to_string(path)?;
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    let dialect = detect_format(filename, &content);
    let mut doc = match dialect {
        Dialect::Markup => MarkupParser::parse(&content),
        Dialect::LineA => LineParser::parse(&content, &CAB_DIALECT),
        Dialect::LineB => LineParser::parse(&content, &DES_DIALECT),
        Dialect::Model => ModelParser::parse(&content),
    };

    // Everything is critical in this report
    let config = DetectorConfig {
        missing_parameter: FindingSeverity::Critical,
        invalid_constraint: FindingSeverity::Critical,
        orphaned_part: FindingSeverity::Critical,
        missing_required_params: FindingSeverity::Critical,
    };
    let findings = BrokenLogicDetector::with_config(config).check(&mut doc, dialect);

    println!(
        "{} findings in {} part(s) of {}",
        findings.len(),
        doc.parts.len(),
        path.display()
    );
    for finding in &findings {
        println!("  [{:?}] {}", finding.issue_type, finding.description);
    }
    if findings
        .iter()
        .any(|f| f.severity == FindingSeverity::Critical)
    {
        std::process::exit(1);
    }
    Ok(())
}
