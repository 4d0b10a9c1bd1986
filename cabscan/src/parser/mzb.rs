//! Mathematical-Model Dialect Parser (`.mzb`)
//!
//! Same line-scanning shape as the CAB-style families, with its own
//! header literals plus a post-pass that buckets parameters into
//! `variables` / `constants` / `boundaries` purely by name. Buckets are
//! informational tags; nothing downstream branches on them.

use crate::model::ParameterBucket;
use crate::parser::line::{LineDialect, LineParser};
use crate::parser::ParsedDocument;

const MZB_DIALECT: LineDialect = LineDialect {
    part_header: "MZB_BLOCK",
    rule_header: "MZB_RULE",
    part_type: "model_block",
    attach_constraints: true,
};

pub struct ModelParser;

impl ModelParser {
    pub fn parse(content: &str) -> ParsedDocument {
        let mut doc = LineParser::parse(content, &MZB_DIALECT);
        for part in &mut doc.parts {
            for param in &mut part.parameters {
                param.bucket = classify_bucket(&param.name);
            }
        }
        doc
    }
}

/// Bucket a parameter by name alone.
fn classify_bucket(name: &str) -> Option<ParameterBucket> {
    let n = name.to_lowercase();
    if n.starts_with("var") || n.contains("_var") {
        Some(ParameterBucket::Variables)
    } else if n.starts_with("const") || n.contains("_const") {
        Some(ParameterBucket::Constants)
    } else if n.starts_with("bound") || n.contains("limit") || n.contains("_max") || n.contains("_min") {
        Some(ParameterBucket::Boundaries)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_blocks_parse_like_line_dialect() {
        let input = "MZB_BLOCK shelf_load\nvar_deflection = 0.0\nconst_e_modulus = 9500\nload_limit = 80 kg\nMZB_RULE sag var_deflection < 3\n";
        let doc = ModelParser::parse(input);
        assert_eq!(doc.parts.len(), 1);
        assert_eq!(doc.parts[0].part_type, "model_block");
        assert_eq!(doc.parts[0].parameters.len(), 3);
        assert_eq!(doc.parts[0].constraints.len(), 1);
    }

    #[test]
    fn test_bucket_classification() {
        assert_eq!(classify_bucket("var_x"), Some(ParameterBucket::Variables));
        assert_eq!(
            classify_bucket("const_gravity"),
            Some(ParameterBucket::Constants)
        );
        assert_eq!(
            classify_bucket("load_limit"),
            Some(ParameterBucket::Boundaries)
        );
        assert_eq!(classify_bucket("material"), None);
    }

    #[test]
    fn test_buckets_are_tags_not_types() {
        let input = "MZB_BLOCK b\nvar_x = 1\nmaterial = oak\n";
        let doc = ModelParser::parse(input);
        let params = &doc.parts[0].parameters;
        assert_eq!(params[0].bucket, Some(ParameterBucket::Variables));
        assert_eq!(params[1].bucket, None);
        // Both are ordinary parameters regardless of bucket
        assert_eq!(params.len(), 2);
    }
}
