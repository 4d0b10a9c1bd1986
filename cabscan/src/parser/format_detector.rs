//! Dialect detection: extension lookup with content-signature fallback.
//!
//! Detection is total. Unknown inputs fall back to the markup dialect,
//! which is the permissive default (the markup parser degrades gracefully
//! on non-markup text by reporting recoverable errors).

use serde::{Deserialize, Serialize};

/// One of the four supported file grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Angle-bracket markup (`.xml`).
    Markup,
    /// CAB-family line dialect (`.cab`, `.moz`).
    LineA,
    /// DES-family line dialect (`.cabx`, `.dat`, `.des`).
    LineB,
    /// Mathematical-model dialect (`.mzb`).
    Model,
}

impl Dialect {
    /// File extensions recognized for this dialect (lowercase, no dot).
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Dialect::Markup => &["xml"],
            Dialect::LineA => &["cab", "moz"],
            Dialect::LineB => &["cabx", "dat", "des"],
            Dialect::Model => &["mzb"],
        }
    }

    /// Whether this grammar can mark a parameter as required. Only the
    /// markup dialect carries a `required` attribute; the line grammars
    /// have no way to express it.
    pub fn supports_required_flag(&self) -> bool {
        matches!(self, Dialect::Markup)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Markup => "markup",
            Dialect::LineA => "line-style-A",
            Dialect::LineB => "line-style-B",
            Dialect::Model => "model",
        }
    }
}

/// All extensions the engine accepts, used by file discovery.
pub const KNOWN_EXTENSIONS: &[&str] = &["xml", "cab", "moz", "cabx", "dat", "des", "mzb"];

/// Classify an input into exactly one dialect.
///
/// Extension lookup first (case-insensitive); if the extension is
/// unrecognized, sniff the content; if nothing matches, default to
/// markup. Never fails.
pub fn detect_format(filename: &str, content: &str) -> Dialect {
    if let Some(ext) = extension_of(filename) {
        match ext.as_str() {
            "xml" => return Dialect::Markup,
            "cab" | "moz" => return Dialect::LineA,
            "cabx" | "dat" | "des" => return Dialect::LineB,
            "mzb" => return Dialect::Model,
            _ => {}
        }
    }
    sniff_content(content)
}

fn extension_of(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn sniff_content(content: &str) -> Dialect {
    let head = content.trim_start();
    if head.starts_with("<?xml") || head.starts_with('<') {
        return Dialect::Markup;
    }
    if content.contains("CAB_") {
        return Dialect::LineA;
    }
    if content.contains("DES_") {
        return Dialect::LineB;
    }
    if content.contains("MZB_") {
        return Dialect::Model;
    }
    // Permissive fallback, not a silent failure: the markup parser will
    // record recoverable errors for anything it cannot make sense of.
    Dialect::Markup
}
