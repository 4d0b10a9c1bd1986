pub mod format_detector;
pub mod line;
pub mod markup;
pub mod mzb;

use crate::model::{Constraint, Parameter, ParseIssue, Part, Section};

// Re-export for convenience
pub use format_detector::{detect_format, Dialect, KNOWN_EXTENSIONS};
pub use line::{LineDialect, LineParser, CAB_DIALECT, DES_DIALECT};
pub use markup::{classify, MarkupParser, NodeClass};
pub use mzb::ModelParser;

/// Intermediate output of a dialect parser, before result assembly.
///
/// Parsers are total: recoverable problems land in `errors`/`warnings`
/// and parsing continues on a best-effort basis.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub parts: Vec<Part>,
    /// Top-level parameters with no owning part (markup dialect only).
    pub orphan_parameters: Vec<Parameter>,
    /// Constraints recorded at document level (dialects without attachment).
    pub top_level_constraints: Vec<Constraint>,
    pub sections: Vec<Section>,
    pub errors: Vec<ParseIssue>,
    pub warnings: Vec<ParseIssue>,
}
