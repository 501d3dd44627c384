//! Commit history analysis: what changed since the last release, and what
//! kind of change each commit describes.

pub mod change_analyzer;
pub mod classifier;

pub use change_analyzer::ChangeAnalyzer;
pub use classifier::classify;
