//! CabScan - cabinet/CAD design file parsing and diagnostics library
//!
//! This library ingests four text/markup dialects used by cabinet-design
//! tooling and normalizes them into one structural model: parts, their
//! parameters, constraints over those parameters, inter-entity
//! dependencies and a version descriptor. A rule-based consistency
//! checker then flags structurally or logically broken definitions
//! before the data reaches downstream storage or analysis.
//!
//! # Quick Start
//!
//! ```
//! use cabscan::CabScanCore;
//!
//! let input = b"CAB_PART base_unit\nwidth = 600 mm\nheight = 720 mm\n";
//! let result = CabScanCore::parse(input, "kitchen.cab").unwrap();
//!
//! assert_eq!(result.statistics.total_parts, 1);
//! for finding in &result.findings {
//!     println!("{:?}: {}", finding.severity, finding.description);
//! }
//! ```
//!
//! # Features
//!
//! - **Four dialects**: markup (`.xml`), two CAB-style line families
//!   (`.cab`/`.moz` and `.cabx`/`.dat`/`.des`), and a mathematical-model
//!   dialect (`.mzb`)
//! - **Broken-logic detection**: missing required values, invalid
//!   constraints, orphaned parts
//! - **Dependency analysis**: `{reference}` edges with a graph view
//! - **Never aborts on malformed content**: recoverable problems are
//!   recorded in the result; only undecodable bytes fail

pub mod analyzer;
pub mod core;
pub mod model;
pub mod parser;

// Re-export main types
pub use crate::core::{discover_design_files, CabScanCore, CabScanError};
pub use analyzer::broken_logic::{BrokenLogicDetector, DetectorConfig};
pub use analyzer::dependencies::{DependencyAnalyzer, DependencyGraph};
pub use model::{
    BrokenLogicFinding, Constraint, Dependency, FindingKind, FindingSeverity, Parameter,
    ParameterValue, ParseResult, ParseStatistics, Part, VersionMetadata,
};
pub use parser::format_detector::{detect_format, Dialect};

/// Parse a design file buffer (convenience wrapper).
pub fn parse_design(bytes: &[u8], filename: &str) -> Result<ParseResult, CabScanError> {
    CabScanCore::parse(bytes, filename)
}

/// Load and parse a design file from disk (caller-side convenience; the
/// engine itself does no I/O).
pub fn parse_design_file(path: &std::path::Path) -> Result<ParseResult, CabScanError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    CabScanCore::parse(&bytes, filename)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BrokenLogicFinding, CabScanCore, CabScanError, Dialect, FindingKind, FindingSeverity,
        ParseResult, ParseStatistics,
    };
}
