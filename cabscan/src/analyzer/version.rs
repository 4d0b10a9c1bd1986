//! Version Extractor
//!
//! Scans raw source text for a `version`-keyed dotted numeric token and
//! decomposes it into major/minor/patch. Missing components default to 0;
//! no token at all yields the `1.0.0` default. Never fails.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::VersionMetadata;

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // The keyword must not be the tail of a longer word ("conversion"),
        // but `CAB_VERSION` and the like must still match, so the guard is
        // "start or a non-letter" rather than a word boundary.
        Regex::new(r#"(?i)(?:^|[^a-z])version\s*["':=\s]\s*"?v?(\d+(?:\.\d+){0,2})"#)
            .expect("version pattern is valid")
    })
}

pub fn extract_version(content: &str) -> VersionMetadata {
    let Some(caps) = version_re().captures(content) else {
        return VersionMetadata::default();
    };
    let token = &caps[1];
    let mut components = token.split('.').map(|c| c.parse::<u32>().unwrap_or(0));
    let major = components.next().unwrap_or(0);
    let minor = components.next().unwrap_or(0);
    let patch = components.next().unwrap_or(0);
    VersionMetadata {
        version: token.to_string(),
        major,
        minor,
        patch,
        build: None,
        compatibility: Vec::new(),
        changelog: Vec::new(),
    }
}
