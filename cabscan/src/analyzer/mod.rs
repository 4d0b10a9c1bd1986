pub mod broken_logic;
pub mod complexity;
pub mod dependencies;
pub mod version;

// Re-export for convenience
pub use broken_logic::{BrokenLogicDetector, DetectorConfig};
pub use complexity::complexity_score;
pub use dependencies::{DependencyAnalyzer, DependencyGraph};
pub use version::extract_version;
