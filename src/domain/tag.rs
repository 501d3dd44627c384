use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern. The pattern must contain exactly one
    /// `{version}` placeholder.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches("{version}").count() != 1 {
            return Err(ReleaseError::config(format!(
                "Tag pattern '{}' must contain exactly one {{version}} placeholder",
                pattern
            )));
        }
        Ok(TagPattern { pattern })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }

    /// Extract the version from a tag that follows this pattern.
    pub fn parse(&self, tag: &str) -> Option<Version> {
        let (prefix, suffix) = self.pattern.split_once("{version}")?;
        let inner = tag.strip_prefix(prefix)?.strip_suffix(suffix)?;
        Version::parse(inner).ok()
    }

    /// Validate if a tag matches this pattern
    pub fn matches(&self, tag: &str) -> bool {
        self.parse(tag).is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 3, 0)), "v1.3.0");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}-st").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "release-1.2.3-st");
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = TagPattern::default();
        assert!(pattern.matches("v1.2.3"));
        assert!(!pattern.matches("release-1.2.3"));
        assert!(!pattern.matches("v1.2"));
        assert!(!pattern.matches("nightly"));
    }

    #[test]
    fn test_pattern_parse() {
        let pattern = TagPattern::default();
        assert_eq!(pattern.parse("v1.2.0"), Some(Version::new(1, 2, 0)));
        assert_eq!(pattern.parse("1.2.0"), None);
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("latest").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }
}
