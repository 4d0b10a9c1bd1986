//! Complexity Scorer
//!
//! A bounded 0–100 heuristic indicator of structural size, used only as
//! a coarse sortable signal. Not a correctness measure.

const PART_WEIGHT: usize = 10;
const PARAMETER_WEIGHT: usize = 2;
const CONSTRAINT_WEIGHT: usize = 5;
const MAX_SCORE: usize = 100;

/// `clamp(10·parts + 2·parameters + 5·constraints, 0, 100)`.
pub fn complexity_score(parts: usize, parameters: usize, constraints: usize) -> u32 {
    let raw = PART_WEIGHT * parts + PARAMETER_WEIGHT * parameters + CONSTRAINT_WEIGHT * constraints;
    raw.min(MAX_SCORE) as u32
}
