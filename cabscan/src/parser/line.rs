//! Line-Oriented Dialect Parser
//!
//! Two CAB-style format families share one scanning algorithm: a part
//! header opens a new part, `key = value` lines attach parameters to it,
//! a rule header records a constraint, and end of input closes whatever
//! is still open. The families differ only in their header literals and
//! in whether constraints attach to the open part, so the differences
//! live in a small `LineDialect` table.

use crate::model::{Constraint, Parameter, ParameterValue, ParseIssue, Part, Section, SourceSpan};
use crate::parser::ParsedDocument;

/// Per-family grammar table.
#[derive(Debug, Clone, Copy)]
pub struct LineDialect {
    /// Literal prefix of a part-header line, e.g. `CAB_PART base_unit`.
    pub part_header: &'static str,
    /// Literal prefix of a constraint-header line.
    pub rule_header: &'static str,
    /// Fixed type tag stamped on every part of this family.
    pub part_type: &'static str,
    /// Whether constraints attach to the currently open part or are
    /// recorded at document level.
    pub attach_constraints: bool,
}

/// Family A: `.cab` / `.moz` files.
pub const CAB_DIALECT: LineDialect = LineDialect {
    part_header: "CAB_PART",
    rule_header: "CAB_RULE",
    part_type: "cabinet_part",
    attach_constraints: true,
};

/// Family B: `.cabx` / `.dat` / `.des` files.
pub const DES_DIALECT: LineDialect = LineDialect {
    part_header: "DES_PART",
    rule_header: "DES_RULE",
    part_type: "design_part",
    attach_constraints: false,
};

/// Parser for the line-oriented dialect families.
pub struct LineParser;

impl LineParser {
    /// Scan `content` line by line. Total: never fails, problems are
    /// recorded in the returned document.
    pub fn parse(content: &str, dialect: &LineDialect) -> ParsedDocument {
        let mut doc = ParsedDocument::default();
        // The "current part" cursor is local fold state, not shared
        // mutable state; the parser is reentrant.
        let mut current: Option<Part> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            if let Some(rest) = strip_header(line, dialect.part_header) {
                let Some(name) = rest.split_whitespace().next() else {
                    doc.errors.push(ParseIssue::parsing(
                        format!("{} header without an identifier", dialect.part_header),
                        Some(SourceSpan::line(line_no)),
                    ));
                    continue;
                };
                if let Some(prev) = current.take() {
                    Self::close_part(prev, line_no - 1, &mut doc);
                }
                let mut part = Part::new(name, dialect.part_type);
                part.span = Some(SourceSpan::line(line_no));
                doc.sections.push(Section {
                    name: name.to_string(),
                    depth: 0,
                    line: line_no,
                    children: Vec::new(),
                });
                current = Some(part);
            } else if let Some(rest) = strip_header(line, dialect.rule_header) {
                let Some(name) = rest.split_whitespace().next() else {
                    doc.errors.push(ParseIssue::parsing(
                        format!("{} header without an identifier", dialect.rule_header),
                        Some(SourceSpan::line(line_no)),
                    ));
                    continue;
                };
                let condition = rest[name.len()..].trim();
                let mut constraint = Constraint::new(name, condition);
                constraint.span = Some(SourceSpan::line(line_no));
                match current.as_mut() {
                    Some(part) if dialect.attach_constraints => {
                        part.constraints.push(constraint)
                    }
                    _ => doc.top_level_constraints.push(constraint),
                }
            } else if let Some((key, value)) = split_key_value(line) {
                match current.as_mut() {
                    Some(part) => {
                        let (value, unit) = infer_with_unit(value);
                        let mut param = Parameter::new(key, value);
                        param.unit = unit;
                        param.span = Some(SourceSpan::line(line_no));
                        part.parameters.push(param);
                    }
                    None => {
                        // No top-level parameter scope in the line dialects:
                        // values before the first part header are dropped.
                        doc.warnings.push(ParseIssue::structure(
                            format!("discarded value line before any part header: '{line}'"),
                            Some(SourceSpan::line(line_no)),
                        ));
                    }
                }
            }
            // Anything else is inert text; skip it.
        }

        let total_lines = content.lines().count();
        if let Some(part) = current.take() {
            Self::close_part(part, total_lines, &mut doc);
        }
        doc
    }

    fn close_part(mut part: Part, end_line: usize, doc: &mut ParsedDocument) {
        if let Some(span) = part.span.as_mut() {
            span.end_line = end_line.max(span.start_line);
        }
        doc.parts.push(part);
    }
}

/// Strip a header literal, requiring whitespace (or end of line) after it
/// so `CAB_PARTITION` is not mistaken for a `CAB_PART` header.
fn strip_header<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(header)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Parse a bare `key = value` or `key: value` line. The key must be a
/// single whitespace-free token.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(|c| c == '=' || c == ':')?;
    let key = line[..pos].trim();
    let value = line[pos + 1..].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}

/// Infer a typed value, splitting off a trailing unit token when the
/// value reads `<number> <unit>` (e.g. `18 mm`).
fn infer_with_unit(raw: &str) -> (ParameterValue, Option<String>) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() == 2 {
        if let Ok(n) = tokens[0].parse::<f64>() {
            if tokens[1].chars().all(|c| c.is_ascii_alphabetic()) {
                return (ParameterValue::Number(n), Some(tokens[1].to_string()));
            }
        }
    }
    (ParameterValue::infer(raw), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_header_opens_and_closes() {
        let input = "CAB_PART base_unit\nwidth = 600\nCAB_PART wall_unit\nwidth = 400\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        assert_eq!(doc.parts.len(), 2);
        assert_eq!(doc.parts[0].name, "base_unit");
        assert_eq!(doc.parts[1].name, "wall_unit");
        assert_eq!(doc.parts[0].parameters.len(), 1);
        assert_eq!(doc.parts[0].part_type, "cabinet_part");
    }

    #[test]
    fn test_value_type_inference() {
        let input = "CAB_PART p\ncount = 3\nflag = true\nmaterial = oak\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        let params = &doc.parts[0].parameters;
        assert_eq!(params[0].value, ParameterValue::Number(3.0));
        assert_eq!(params[1].value, ParameterValue::Boolean(true));
        assert_eq!(params[2].value, ParameterValue::String("oak".to_string()));
    }

    #[test]
    fn test_unit_split() {
        let input = "CAB_PART p\nthickness = 18 mm\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        let param = &doc.parts[0].parameters[0];
        assert_eq!(param.value, ParameterValue::Number(18.0));
        assert_eq!(param.unit.as_deref(), Some("mm"));
    }

    #[test]
    fn test_colon_separator() {
        let input = "DES_PART p\nmaterial: plywood\n";
        let doc = LineParser::parse(input, &DES_DIALECT);
        assert_eq!(doc.parts[0].parameters[0].name, "material");
    }

    #[test]
    fn test_constraint_attachment_per_family() {
        let input = "CAB_PART p\nCAB_RULE min_width width > 100\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        assert_eq!(doc.parts[0].constraints.len(), 1);
        assert!(doc.top_level_constraints.is_empty());

        let input = "DES_PART p\nDES_RULE min_width width > 100\n";
        let doc = LineParser::parse(input, &DES_DIALECT);
        assert!(doc.parts[0].constraints.is_empty());
        assert_eq!(doc.top_level_constraints.len(), 1);
        assert_eq!(doc.top_level_constraints[0].value, "width > 100");
    }

    #[test]
    fn test_orphan_value_line_discarded() {
        let input = "width = 600\nCAB_PART p\nheight = 720\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].parameters.len(), 1);
        assert!(doc.orphan_parameters.is_empty());
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn test_header_prefix_is_not_greedy() {
        // CAB_PARTITION is a key=value-less inert line, not a part header
        let input = "CAB_PARTITION\nCAB_PART real\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].name, "real");
    }

    #[test]
    fn test_header_without_identifier_is_recoverable() {
        let input = "CAB_PART\nCAB_PART ok\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.errors.len(), 1);
    }

    #[test]
    fn test_part_span_covers_its_lines() {
        let input = "CAB_PART p\na = 1\nb = 2\n";
        let doc = LineParser::parse(input, &CAB_DIALECT);
        let span = doc.parts[0].span.unwrap();
        assert_eq!(span.start_line, 1);
        assert_eq!(span.end_line, 3);
    }
}
