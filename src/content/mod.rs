//! Release text: bullets derived from the classification, and the fixed
//! templates that wrap them for each output (message file, release body,
//! commit and tag messages).

pub mod notes;
pub mod templates;

pub use notes::ReleaseContent;
pub use templates::ReleaseContext;
