//! Normalized design model shared by all dialect parsers.
//!
//! Every dialect is reduced to the same three core entities (parts,
//! parameters, constraints) plus a generic section tree, version metadata,
//! inferred dependencies and broken-logic findings. The whole model is
//! serde-serializable so downstream storage can persist results as-is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 1-based line range an entity was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl SourceSpan {
    pub fn line(line: usize) -> Self {
        Self {
            start_line: line,
            end_line: line,
        }
    }
}

/// Validity status of a part after broken-logic detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Valid,
    Broken,
    Warning,
}

impl Default for ValidationStatus {
    fn default() -> Self {
        ValidationStatus::Valid
    }
}

/// Typed parameter value. Types are inferred from literal syntax, never
/// declared by the source formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParameterValue {
    String(String),
    Number(f64),
    Boolean(bool),
    List(Vec<ParameterValue>),
    Object(BTreeMap<String, ParameterValue>),
}

impl ParameterValue {
    /// Infer a typed value from a raw literal: numeric → Number,
    /// `true`/`false` → Boolean, anything else → String.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<f64>() {
            return ParameterValue::Number(n);
        }
        match trimmed {
            "true" | "false" => ParameterValue::Boolean(trimmed == "true"),
            _ => ParameterValue::String(trimmed.to_string()),
        }
    }

    /// True for the empty string; every other value counts as present.
    pub fn is_empty(&self) -> bool {
        matches!(self, ParameterValue::String(s) if s.trim().is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for ParameterValue {
    fn default() -> Self {
        ParameterValue::String(String::new())
    }
}

/// Semantic bucket for model-dialect parameters. Informational only;
/// no downstream logic branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterBucket {
    Variables,
    Constants,
    Boundaries,
}

/// A named value attached to a part (or, for the markup dialect only,
/// orphaned at document top level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub name: String,
    pub value: ParameterValue,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    pub default_value: Option<ParameterValue>,
    pub validation_rules: Vec<String>,
    pub bucket: Option<ParameterBucket>,
    pub span: Option<SourceSpan>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            value,
            unit: None,
            description: None,
            required: false,
            default_value: None,
            validation_rules: Vec::new(),
            bucket: None,
            span: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Range,
    Enum,
    Regex,
    Custom,
}

impl ConstraintKind {
    /// Guess the kind from the condition text. Free-text conditions from
    /// the line dialects default to Custom.
    pub fn infer(condition: &str) -> Self {
        let c = condition.trim();
        if c.contains('~') || c.to_lowercase().contains("matches") {
            ConstraintKind::Regex
        } else if c.contains('|') || c.to_lowercase().contains("in(") {
            ConstraintKind::Enum
        } else if c.contains("..") || c.contains('<') || c.contains('>') {
            ConstraintKind::Range
        } else {
            ConstraintKind::Custom
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintSeverity {
    Error,
    Warning,
    Info,
}

/// A validation rule referencing one or more parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub name: String,
    pub kind: ConstraintKind,
    /// Condition payload: free text for the line dialects, an expression
    /// string for the markup/model dialects.
    pub value: String,
    pub severity: ConstraintSeverity,
    pub affected_parameters: Vec<String>,
    pub span: Option<SourceSpan>,
}

impl Constraint {
    pub fn new(name: impl Into<String>, condition: impl Into<String>) -> Self {
        let value = condition.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind: ConstraintKind::infer(&value),
            value,
            severity: ConstraintSeverity::Error,
            affected_parameters: Vec::new(),
            span: None,
        }
    }
}

/// Free-form metadata carried by a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMetadata {
    pub version: Option<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub author: Option<String>,
    pub description: Option<String>,
}

impl Default for PartMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: None,
            created: now,
            modified: now,
            author: None,
            description: None,
        }
    }
}

/// A named structural unit extracted from a design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub part_type: String,
    pub parameters: Vec<Parameter>,
    pub constraints: Vec<Constraint>,
    pub metadata: PartMetadata,
    pub span: Option<SourceSpan>,
    pub status: ValidationStatus,
    pub errors: Vec<String>,
}

impl Part {
    pub fn new(name: impl Into<String>, part_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            part_type: part_type.into(),
            parameters: Vec::new(),
            constraints: Vec::new(),
            metadata: PartMetadata::default(),
            span: None,
            status: ValidationStatus::Valid,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Requires,
    Includes,
    References,
    Extends,
}

/// Directed edge between two entities, produced by the dependency analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: String,
    pub to: String,
    pub kind: DependencyKind,
}

/// Version descriptor extracted from the raw source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    pub version: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<String>,
    pub compatibility: Vec<String>,
    pub changelog: Vec<String>,
}

impl Default for VersionMetadata {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            major: 1,
            minor: 0,
            patch: 0,
            build: None,
            compatibility: Vec::new(),
            changelog: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    MissingParameter,
    InvalidConstraint,
    OrphanedPart,
    MissingRequiredParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// One anomaly surfaced by the broken-logic detector. Findings are
/// advisory annotations; they never remove or invalidate entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokenLogicFinding {
    pub part_id: String,
    pub issue_type: FindingKind,
    pub severity: FindingSeverity,
    pub description: String,
    pub suggested_fix: Option<String>,
    pub span: Option<SourceSpan>,
}

/// Generic section record; rebuilds the file-structure view of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub depth: usize,
    pub line: usize,
    pub children: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Parsing,
    Structure,
}

/// A recoverable problem recorded during parsing. Distinct channel from
/// broken-logic findings: a file can parse with zero issues and still
/// surface many findings, and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub kind: IssueKind,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl ParseIssue {
    pub fn parsing(message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Self {
            kind: IssueKind::Parsing,
            message: message.into(),
            span,
        }
    }

    pub fn structure(message: impl Into<String>, span: Option<SourceSpan>) -> Self {
        Self {
            kind: IssueKind::Structure,
            message: message.into(),
            span,
        }
    }
}

/// Aggregate counters for one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseStatistics {
    pub total_parts: usize,
    pub total_parameters: usize,
    pub total_constraints: usize,
    pub broken_logic_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub processing_time_ms: f64,
    pub file_size: usize,
    pub complexity_score: u32,
}

/// Root aggregate handed to callers; immutable after assembly.
///
/// `parameters` and `constraints` are flat views over everything in the
/// document (part-owned entities plus top-level orphans), so the count
/// invariants `total_parameters == parameters.len()` etc. read directly
/// off the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub dialect: crate::parser::format_detector::Dialect,
    pub filename: String,
    pub parts: Vec<Part>,
    pub parameters: Vec<Parameter>,
    pub constraints: Vec<Constraint>,
    pub dependencies: Vec<Dependency>,
    pub version: VersionMetadata,
    pub findings: Vec<BrokenLogicFinding>,
    pub sections: Vec<Section>,
    pub statistics: ParseStatistics,
    pub errors: Vec<ParseIssue>,
    pub warnings: Vec<ParseIssue>,
}
