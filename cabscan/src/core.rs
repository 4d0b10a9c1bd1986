//! Engine entry points and result assembly.
//!
//! One invocation takes one byte buffer plus a filename hint and returns
//! one immutable `ParseResult`. The engine is synchronous, holds no
//! cross-call state and performs no I/O of its own; only an undecodable
//! buffer is a hard failure, everything else degrades into recorded
//! errors and warnings inside the result.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analyzer::broken_logic::BrokenLogicDetector;
use crate::analyzer::complexity::complexity_score;
use crate::analyzer::dependencies::DependencyAnalyzer;
use crate::analyzer::version::extract_version;
use crate::model::{Constraint, Parameter, ParseResult, ParseStatistics};
use crate::parser::format_detector::{detect_format, Dialect, KNOWN_EXTENSIONS};
use crate::parser::line::{LineParser, CAB_DIALECT, DES_DIALECT};
use crate::parser::markup::MarkupParser;
use crate::parser::mzb::ModelParser;

#[derive(Debug, thiserror::Error)]
pub enum CabScanError {
    /// The buffer cannot be interpreted as text at all. The only error
    /// that aborts a parse.
    #[error("decode error: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Core parsing API.
pub struct CabScanCore;

impl CabScanCore {
    /// Parse one design file buffer into a normalized result.
    ///
    /// Never fails for malformed domain content — recoverable problems
    /// land in the result's `errors`/`warnings` and broken-logic
    /// findings. Only an undecodable byte sequence raises, and then no
    /// partial result is produced.
    pub fn parse(bytes: &[u8], filename: &str) -> Result<ParseResult, CabScanError> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| CabScanError::Decode(format!("input is not valid UTF-8: {e}")))?;
        Ok(Self::parse_str(content, filename))
    }

    /// Parse pre-decoded text. Infallible: the dialect parsers are total
    /// and every later stage is a pure function over their output.
    pub fn parse_str(content: &str, filename: &str) -> ParseResult {
        let started = Instant::now();
        let dialect = detect_format(filename, content);
        tracing::debug!(dialect = dialect.name(), filename, "parsing design file");

        let mut doc = match dialect {
            Dialect::Markup => MarkupParser::parse(content),
            Dialect::LineA => LineParser::parse(content, &CAB_DIALECT),
            Dialect::LineB => LineParser::parse(content, &DES_DIALECT),
            Dialect::Model => ModelParser::parse(content),
        };

        let findings = BrokenLogicDetector::new().check(&mut doc, dialect);
        let version = extract_version(content);

        // Flat views over every parameter/constraint in the document,
        // part-owned entities first, then top-level orphans.
        let mut parameters: Vec<Parameter> = Vec::new();
        let mut constraints: Vec<Constraint> = Vec::new();
        for part in &doc.parts {
            parameters.extend(part.parameters.iter().cloned());
            constraints.extend(part.constraints.iter().cloned());
        }
        parameters.extend(doc.orphan_parameters.iter().cloned());
        constraints.extend(doc.top_level_constraints.iter().cloned());

        let dependencies = DependencyAnalyzer::analyze(&parameters);

        let statistics = ParseStatistics {
            total_parts: doc.parts.len(),
            total_parameters: parameters.len(),
            total_constraints: constraints.len(),
            broken_logic_count: findings.len(),
            error_count: doc.errors.len(),
            warning_count: doc.warnings.len(),
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            file_size: content.len(),
            complexity_score: complexity_score(
                doc.parts.len(),
                parameters.len(),
                constraints.len(),
            ),
        };

        ParseResult {
            dialect,
            filename: filename.to_string(),
            parts: doc.parts,
            parameters,
            constraints,
            dependencies,
            version,
            findings,
            sections: doc.sections,
            statistics,
            errors: doc.errors,
            warnings: doc.warnings,
        }
    }
}

/// Recursively discover design files under a directory. Caller-side
/// convenience for the CLI; the engine itself never touches the
/// filesystem.
pub fn discover_design_files(dir: &Path) -> Result<Vec<PathBuf>, CabScanError> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files, 0)?;
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>, depth: usize) -> Result<(), CabScanError> {
    if depth > 20 {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || name == "node_modules" || name == "target" || name == "build"
            {
                continue;
            }
            walk_dir(&path, files, depth + 1)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
                if KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}
