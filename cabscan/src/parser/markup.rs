//! Markup Dialect Parser
//!
//! Walks the element tree of an angle-bracket markup document and
//! classifies each named node as part / parameter / constraint by
//! heuristic name and shape match. A node may satisfy more than one
//! heuristic; all matching classifications contribute entities (a part
//! node carrying a `value` attribute also yields a parameter) and the
//! ambiguity is surfaced as a structure warning. Every visited element
//! additionally becomes a generic section record, so the result keeps a
//! file-structure view of the document.
//!
//! Malformed markup is reported as a recoverable parsing error; the
//! parser keeps going over the remaining well-formed content and never
//! aborts the whole file on one local error.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::model::{
    Constraint, ConstraintSeverity, Parameter, ParameterValue, ParseIssue, Part, Section,
    SourceSpan,
};
use crate::parser::ParsedDocument;

/// Upper bound on recorded markup errors before giving up on the rest of
/// the input.
const MAX_PARSE_ERRORS: usize = 20;

/// Primary classification of one markup element. Total: every element
/// maps to exactly one variant, with precedence part > parameter >
/// constraint when several heuristics match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    Part,
    Parameter,
    Constraint,
    Unclassified,
}

/// Pure classification of a tag name plus its attributes.
pub fn classify(tag: &str, attrs: &BTreeMap<String, String>) -> NodeClass {
    let (part, param, constraint) = heuristic_matches(tag, attrs);
    if part {
        NodeClass::Part
    } else if param {
        NodeClass::Parameter
    } else if constraint {
        NodeClass::Constraint
    } else {
        NodeClass::Unclassified
    }
}

/// The three overlapping heuristics, evaluated independently.
fn heuristic_matches(tag: &str, attrs: &BTreeMap<String, String>) -> (bool, bool, bool) {
    let tag_l = tag.to_lowercase();
    let is_part = tag_l.contains("part")
        || tag_l.contains("component")
        || attrs.contains_key("type")
        || attrs.contains_key("id");
    let is_param = tag_l.contains("param")
        || tag_l.contains("attribute")
        || attrs.contains_key("value")
        || attrs.contains_key("type");
    let is_constraint = tag_l.contains("constraint")
        || tag_l.contains("rule")
        || attrs.contains_key("condition")
        || attrs.contains_key("rule");
    (is_part, is_param, is_constraint)
}

/// One open element while walking the tree.
struct Frame {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    line: usize,
    /// Set when this element opened a part (index into the open-part stack
    /// is implicit: parts close strictly LIFO).
    opened_part: bool,
    children: Vec<Section>,
}

pub struct MarkupParser;

impl MarkupParser {
    /// Parse markup text. Total: malformed input degrades into recorded
    /// parsing errors, never a failure.
    pub fn parse(content: &str) -> ParsedDocument {
        let mut reader = Reader::from_str(content);
        let config = reader.config_mut();
        config.trim_text(true);

        let mut doc = ParsedDocument::default();
        let mut frames: Vec<Frame> = Vec::new();
        let mut open_parts: Vec<Part> = Vec::new();
        let mut error_count = 0usize;
        let mut last_error_pos = u64::MAX;

        loop {
            let pos = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let frame = Self::open_frame(&e, line_at(content, pos as usize), &mut doc, &mut open_parts);
                    frames.push(frame);
                }
                Ok(Event::Empty(e)) => {
                    let frame = Self::open_frame(&e, line_at(content, pos as usize), &mut doc, &mut open_parts);
                    Self::close_frame(frame, line_at(content, pos as usize), &mut frames, &mut doc, &mut open_parts);
                }
                Ok(Event::Text(t)) => {
                    if let Some(frame) = frames.last_mut() {
                        if let Ok(text) = t.unescape() {
                            frame.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(frame) = frames.last_mut() {
                        frame.text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Ok(Event::End(_)) => {
                    if let Some(frame) = frames.pop() {
                        let end_line = line_at(content, reader.buffer_position() as usize);
                        Self::close_frame(frame, end_line, &mut frames, &mut doc, &mut open_parts);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => {
                    let err_pos = reader.error_position();
                    doc.errors.push(ParseIssue::parsing(
                        format!("malformed markup: {err}"),
                        Some(SourceSpan::line(line_at(content, err_pos as usize))),
                    ));
                    error_count += 1;
                    // Stop when the reader cannot make progress or the
                    // input is hopeless; otherwise keep scanning the
                    // remaining well-formed content.
                    if error_count >= MAX_PARSE_ERRORS || err_pos == last_error_pos {
                        tracing::warn!("giving up on markup input after {error_count} errors");
                        break;
                    }
                    last_error_pos = err_pos;
                }
            }
        }

        // Unclosed elements at EOF: flush them so no extracted entity is
        // lost, and report the structural problem.
        while let Some(frame) = frames.pop() {
            let end_line = line_at(content, reader.buffer_position() as usize);
            doc.warnings.push(ParseIssue::structure(
                format!("element '{}' was never closed", frame.tag),
                Some(SourceSpan::line(frame.line)),
            ));
            Self::close_frame(frame, end_line, &mut frames, &mut doc, &mut open_parts);
        }
        // Parts still open after frame flush (shouldn't happen, but a
        // mis-nested document can get here): emit them as-is.
        while let Some(part) = open_parts.pop() {
            doc.parts.push(part);
        }

        doc
    }

    /// Read tag + attributes, record the ambiguity warning, and open a
    /// part when the part heuristic matches.
    fn open_frame(
        e: &BytesStart<'_>,
        line: usize,
        doc: &mut ParsedDocument,
        open_parts: &mut Vec<Part>,
    ) -> Frame {
        let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
        let mut attrs = BTreeMap::new();
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map(|v| v.to_string())
                .unwrap_or_default();
            attrs.insert(key, value);
        }

        let (is_part, is_param, is_constraint) = heuristic_matches(&tag, &attrs);
        let match_count = [is_part, is_param, is_constraint]
            .iter()
            .filter(|m| **m)
            .count();
        if match_count > 1 {
            doc.warnings.push(ParseIssue::structure(
                format!("element '{tag}' matched multiple classifications"),
                Some(SourceSpan::line(line)),
            ));
        }

        if is_part {
            let name = attrs
                .get("name")
                .cloned()
                .unwrap_or_else(|| tag.clone());
            let part_type = attrs.get("type").cloned().unwrap_or_else(|| tag.clone());
            let mut part = Part::new(name, part_type);
            if let Some(desc) = attrs.get("description") {
                part.metadata.description = Some(desc.clone());
            }
            if let Some(version) = attrs.get("version") {
                part.metadata.version = Some(version.clone());
            }
            if let Some(author) = attrs.get("author") {
                part.metadata.author = Some(author.clone());
            }
            part.span = Some(SourceSpan::line(line));
            open_parts.push(part);
        }

        Frame {
            tag,
            attrs,
            text: String::new(),
            line,
            opened_part: is_part,
            children: Vec::new(),
        }
    }

    /// Materialize the entities an element contributes and fold its
    /// section into the tree.
    fn close_frame(
        frame: Frame,
        end_line: usize,
        frames: &mut Vec<Frame>,
        doc: &mut ParsedDocument,
        open_parts: &mut Vec<Part>,
    ) {
        let (_, is_param, is_constraint) = heuristic_matches(&frame.tag, &frame.attrs);

        // The part this element's entities belong to: the element itself
        // when it opened one, else the innermost open part.
        let mut own_part: Option<Part> = if frame.opened_part {
            open_parts.pop()
        } else {
            None
        };

        if is_param {
            let param = Self::build_parameter(&frame);
            if let Some(part) = own_part.as_mut() {
                part.parameters.push(param);
            } else if let Some(part) = open_parts.last_mut() {
                part.parameters.push(param);
            } else {
                doc.orphan_parameters.push(param);
            }
        }

        if is_constraint {
            let constraint = Self::build_constraint(&frame);
            if let Some(part) = own_part.as_mut() {
                part.constraints.push(constraint);
            } else if let Some(part) = open_parts.last_mut() {
                part.constraints.push(constraint);
            } else {
                doc.top_level_constraints.push(constraint);
            }
        }

        if let Some(mut part) = own_part {
            if let Some(span) = part.span.as_mut() {
                span.end_line = end_line.max(span.start_line);
            }
            doc.parts.push(part);
        }

        let section = Section {
            name: frame.tag,
            depth: frames.len(),
            line: frame.line,
            children: frame.children,
        };
        match frames.last_mut() {
            Some(parent) => parent.children.push(section),
            None => doc.sections.push(section),
        }
    }

    fn build_parameter(frame: &Frame) -> Parameter {
        let name = frame
            .attrs
            .get("name")
            .cloned()
            .unwrap_or_else(|| frame.tag.clone());
        let raw_value = frame
            .attrs
            .get("value")
            .cloned()
            .unwrap_or_else(|| frame.text.trim().to_string());
        let mut param = Parameter::new(name, ParameterValue::infer(&raw_value));
        param.unit = frame.attrs.get("unit").cloned();
        param.description = frame.attrs.get("description").cloned();
        param.required = frame.attrs.get("required").map(String::as_str) == Some("true");
        param.default_value = frame
            .attrs
            .get("default")
            .map(|d| ParameterValue::infer(d));
        if let Some(rules) = frame.attrs.get("validation") {
            param.validation_rules = rules
                .split(';')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
        }
        param.span = Some(SourceSpan::line(frame.line));
        param
    }

    fn build_constraint(frame: &Frame) -> Constraint {
        let name = frame
            .attrs
            .get("name")
            .cloned()
            .unwrap_or_else(|| frame.tag.clone());
        let condition = frame
            .attrs
            .get("condition")
            .or_else(|| frame.attrs.get("rule"))
            .or_else(|| frame.attrs.get("expression"))
            .cloned()
            .unwrap_or_else(|| frame.text.trim().to_string());
        let mut constraint = Constraint::new(name, condition);
        if let Some(severity) = frame.attrs.get("severity") {
            constraint.severity = match severity.as_str() {
                "warning" => ConstraintSeverity::Warning,
                "info" => ConstraintSeverity::Info,
                _ => ConstraintSeverity::Error,
            };
        }
        if let Some(refs) = frame
            .attrs
            .get("params")
            .or_else(|| frame.attrs.get("applies_to"))
        {
            constraint.affected_parameters = refs
                .split([',', ' '])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        constraint.span = Some(SourceSpan::line(frame.line));
        constraint
    }
}

/// 1-based line number of a byte offset.
fn line_at(content: &str, pos: usize) -> usize {
    let upto = pos.min(content.len());
    content.as_bytes()[..upto].iter().filter(|b| **b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classify_by_tag_name() {
        assert_eq!(classify("part", &attrs(&[])), NodeClass::Part);
        assert_eq!(classify("Component", &attrs(&[])), NodeClass::Part);
        assert_eq!(classify("param", &attrs(&[])), NodeClass::Parameter);
        assert_eq!(classify("attribute", &attrs(&[])), NodeClass::Parameter);
        assert_eq!(classify("constraint", &attrs(&[])), NodeClass::Constraint);
        assert_eq!(classify("rule", &attrs(&[])), NodeClass::Constraint);
        assert_eq!(classify("design", &attrs(&[])), NodeClass::Unclassified);
    }

    #[test]
    fn test_classify_by_shape() {
        assert_eq!(classify("panel", &attrs(&[("id", "p1")])), NodeClass::Part);
        assert_eq!(
            classify("width", &attrs(&[("value", "450")])),
            NodeClass::Parameter
        );
        assert_eq!(
            classify("check", &attrs(&[("condition", "w > 0")])),
            NodeClass::Constraint
        );
    }

    #[test]
    fn test_classify_precedence() {
        // Matches both part (tag) and parameter (value attr); part wins
        // as the primary class, but both registrations still happen in
        // the tree walk.
        assert_eq!(
            classify("part", &attrs(&[("value", "x")])),
            NodeClass::Part
        );
    }

    #[test]
    fn test_simple_document() {
        let input = r#"<?xml version="1.0"?>
<design>
  <part name="side_panel">
    <param name="width" value="450" unit="mm"/>
    <param name="height" value="720"/>
  </part>
</design>"#;
        let doc = MarkupParser::parse(input);
        assert_eq!(doc.parts.len(), 1);
        let part = &doc.parts[0];
        assert_eq!(part.name, "side_panel");
        assert_eq!(part.parameters.len(), 2);
        assert_eq!(
            part.parameters[0].value,
            ParameterValue::Number(450.0)
        );
        assert_eq!(part.parameters[0].unit.as_deref(), Some("mm"));
        assert!(doc.errors.is_empty());
    }

    #[test]
    fn test_value_from_child_text() {
        let input = r#"<part name="door"><param name="material">oak</param></part>"#;
        let doc = MarkupParser::parse(input);
        assert_eq!(
            doc.parts[0].parameters[0].value,
            ParameterValue::String("oak".to_string())
        );
    }

    #[test]
    fn test_multi_classification_contributes_both() {
        // A part node with a value attribute registers as a part and
        // contributes a parameter to itself.
        let input = r#"<part name="shelf" value="3"/>"#;
        let doc = MarkupParser::parse(input);
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].parameters.len(), 1);
        assert!(!doc.warnings.is_empty());
    }

    #[test]
    fn test_orphan_parameter_at_top_level() {
        let input = r#"<design><param name="global_scale" value="1.5"/></design>"#;
        let doc = MarkupParser::parse(input);
        assert!(doc.parts.is_empty());
        assert_eq!(doc.orphan_parameters.len(), 1);
    }

    #[test]
    fn test_section_tree() {
        let input = r#"<design><part name="a"><param name="w" value="1"/></part></design>"#;
        let doc = MarkupParser::parse(input);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].name, "design");
        assert_eq!(doc.sections[0].children.len(), 1);
        assert_eq!(doc.sections[0].children[0].name, "part");
        assert_eq!(doc.sections[0].children[0].children.len(), 1);
    }

    #[test]
    fn test_malformed_markup_is_recoverable() {
        let input = "<design><part name=\"a\"><param name=\"w\" value=\"1\"/></part><broken <<";
        let doc = MarkupParser::parse(input);
        // Entities from the well-formed prefix survive
        assert_eq!(doc.parts.len(), 1);
        assert!(!doc.errors.is_empty());
    }

    #[test]
    fn test_required_and_default_attributes() {
        let input = r#"<part name="p"><param name="material" required="true" default="oak" value=""/></part>"#;
        let doc = MarkupParser::parse(input);
        let param = &doc.parts[0].parameters[0];
        assert!(param.required);
        assert_eq!(
            param.default_value,
            Some(ParameterValue::String("oak".to_string()))
        );
        assert!(param.value.is_empty());
    }

    #[test]
    fn test_validation_attribute_splits_into_rules() {
        let input =
            r#"<part name="p"><param name="width" value="450" validation="min:100; max:900"/></part>"#;
        let doc = MarkupParser::parse(input);
        let param = &doc.parts[0].parameters[0];
        assert_eq!(param.validation_rules, vec!["min:100", "max:900"]);

        let input = r#"<part name="p"><param name="width" value="450"/></part>"#;
        let doc = MarkupParser::parse(input);
        assert!(doc.parts[0].parameters[0].validation_rules.is_empty());
    }
}
