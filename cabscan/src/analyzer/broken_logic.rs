//! Broken-Logic Detector
//!
//! A fixed, deterministic rule set applied over the parsed entities.
//! Each rule is independent; findings are never merged or deduplicated,
//! even when several rules fire on the same entity. Findings are
//! advisory annotations layered over the model — no rule removes or
//! invalidates an entity. The only mutation is the part status/errors
//! bookkeeping at the end of a pass.

use crate::model::{
    BrokenLogicFinding, Constraint, FindingKind, FindingSeverity, Parameter, ValidationStatus,
};
use crate::parser::format_detector::Dialect;
use crate::parser::ParsedDocument;

/// Severity assignment per rule. Kept as data so tuning never touches
/// detection logic.
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    pub missing_parameter: FindingSeverity,
    pub invalid_constraint: FindingSeverity,
    pub orphaned_part: FindingSeverity,
    pub missing_required_params: FindingSeverity,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            missing_parameter: FindingSeverity::High,
            invalid_constraint: FindingSeverity::Medium,
            orphaned_part: FindingSeverity::Low,
            missing_required_params: FindingSeverity::Low,
        }
    }
}

pub struct BrokenLogicDetector {
    config: DetectorConfig,
}

impl Default for BrokenLogicDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokenLogicDetector {
    pub fn new() -> Self {
        Self::with_config(DetectorConfig::default())
    }

    pub fn with_config(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Run every rule over the document and mark affected parts. The
    /// dialect gates rules that only make sense where the grammar can
    /// express them.
    pub fn check(&self, doc: &mut ParsedDocument, dialect: Dialect) -> Vec<BrokenLogicFinding> {
        let mut findings = Vec::new();

        // Soft signal: parameters exist but none anywhere is marked
        // required. Only meaningful in grammars that carry a required
        // marker at all; in the line dialects every parameter is
        // unmarked by construction.
        let any_parameter = doc.parts.iter().any(|p| !p.parameters.is_empty())
            || !doc.orphan_parameters.is_empty();
        let any_required = doc
            .parts
            .iter()
            .flat_map(|p| p.parameters.iter())
            .chain(doc.orphan_parameters.iter())
            .any(|p| p.required);
        let flag_unmarked_parts =
            dialect.supports_required_flag() && any_parameter && !any_required;

        for part in &doc.parts {
            for param in &part.parameters {
                if let Some(finding) = self.check_required(&part.id, &part.name, param) {
                    findings.push(finding);
                }
            }
            for constraint in &part.constraints {
                if let Some(finding) = self.check_constraint(constraint) {
                    findings.push(finding);
                }
            }
            if part.parameters.is_empty() {
                findings.push(BrokenLogicFinding {
                    part_id: part.id.clone(),
                    issue_type: FindingKind::OrphanedPart,
                    severity: self.config.orphaned_part,
                    description: format!("part '{}' declares no parameters", part.name),
                    suggested_fix: Some(
                        "add parameters to the part or remove the empty definition".to_string(),
                    ),
                    span: part.span,
                });
            } else if flag_unmarked_parts {
                findings.push(BrokenLogicFinding {
                    part_id: part.id.clone(),
                    issue_type: FindingKind::MissingRequiredParams,
                    severity: self.config.missing_required_params,
                    description: format!(
                        "part '{}' has parameters but none is marked required",
                        part.name
                    ),
                    suggested_fix: Some(
                        "mark the parameters that must always be provided as required".to_string(),
                    ),
                    span: part.span,
                });
            }
        }
        // Orphaned parameters have no owning part; the finding references
        // the parameter itself.
        for param in &doc.orphan_parameters {
            if let Some(finding) = self.check_required(&param.id, &param.name, param) {
                findings.push(finding);
            }
        }
        for constraint in &doc.top_level_constraints {
            if let Some(finding) = self.check_constraint(constraint) {
                findings.push(finding);
            }
        }

        tracing::debug!("broken-logic pass produced {} findings", findings.len());
        Self::mark_parts(doc, &findings);
        findings
    }

    /// Missing-required-value rule: `required == true` demands a
    /// non-empty value or a default.
    fn check_required(
        &self,
        owner_id: &str,
        owner_name: &str,
        param: &Parameter,
    ) -> Option<BrokenLogicFinding> {
        if !param.required || !param.value.is_empty() || param.default_value.is_some() {
            return None;
        }
        Some(BrokenLogicFinding {
            part_id: owner_id.to_string(),
            issue_type: FindingKind::MissingParameter,
            severity: self.config.missing_parameter,
            description: format!(
                "required parameter '{}' of '{}' has neither a value nor a default",
                param.name, owner_name
            ),
            suggested_fix: Some(format!(
                "set a value for '{}' or declare a default",
                param.name
            )),
            span: param.span,
        })
    }

    /// Invalid-constraint rule: an empty condition can never validate
    /// anything.
    fn check_constraint(&self, constraint: &Constraint) -> Option<BrokenLogicFinding> {
        if !constraint.value.trim().is_empty() {
            return None;
        }
        let part_id = constraint
            .affected_parameters
            .first()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        Some(BrokenLogicFinding {
            part_id,
            issue_type: FindingKind::InvalidConstraint,
            severity: self.config.invalid_constraint,
            description: format!("constraint '{}' has an empty condition", constraint.name),
            suggested_fix: Some("give the constraint a condition or drop it".to_string()),
            span: constraint.span,
        })
    }

    /// Stamp status/errors onto parts referenced by findings. High and
    /// critical findings break a part; the rest only flag it.
    fn mark_parts(doc: &mut ParsedDocument, findings: &[BrokenLogicFinding]) {
        for part in &mut doc.parts {
            for finding in findings.iter().filter(|f| f.part_id == part.id) {
                if finding.severity >= FindingSeverity::High {
                    part.status = ValidationStatus::Broken;
                    part.errors.push(finding.description.clone());
                } else if part.status == ValidationStatus::Valid {
                    part.status = ValidationStatus::Warning;
                }
            }
        }
    }
}
