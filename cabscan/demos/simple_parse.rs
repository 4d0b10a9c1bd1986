//! Example: parse a design file and print its statistics and findings.
//! Run with: cargo run --example simple_parse [path/to/file.cab]

use std::path::Path;

fn main() -> Result<(), cabscan::CabScanError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_kitchen.cab".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_parse [path/to/file.cab]");
        std::process::exit(1);
    }

    let result = cabscan::parse_design_file(path)?;

    println!("Dialect:    {}", result.dialect.name());
    println!("Version:    {}", result.version.version);
    println!(
        "Entities:   {} parts, {} parameters, {} constraints",
        result.statistics.total_parts,
        result.statistics.total_parameters,
        result.statistics.total_constraints
    );
    println!("Complexity: {}/100", result.statistics.complexity_score);

    if result.findings.is_empty() {
        println!("No broken logic found");
    } else {
        println!("Findings:");
        for finding in &result.findings {
            println!("  [{:?}] {}", finding.severity, finding.description);
            if let Some(ref fix) = finding.suggested_fix {
                println!("    fix: {fix}");
            }
        }
    }
    Ok(())
}
