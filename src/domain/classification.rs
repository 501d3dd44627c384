/// Commit subjects bucketed by the kind of change they describe.
///
/// A subject can sit in several buckets at once, or in none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub features: Vec<String>,
    pub fixes: Vec<String>,
    pub improvements: Vec<String>,
    pub breaking: Vec<String>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
            && self.fixes.is_empty()
            && self.improvements.is_empty()
            && self.breaking.is_empty()
    }

    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking.is_empty()
    }
}
