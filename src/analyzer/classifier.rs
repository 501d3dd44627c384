use crate::domain::{Classification, CommitEntry};

pub const FEATURE_KEYWORDS: &[&str] = &["feat", "add", "new", "implement"];
pub const FIX_KEYWORDS: &[&str] = &["fix", "bug", "error", "issue"];
pub const IMPROVEMENT_KEYWORDS: &[&str] = &["improve", "enhance", "update", "refactor"];
pub const BREAKING_KEYWORDS: &[&str] = &["break", "breaking", "major"];

pub const MAX_FEATURES: usize = 10;
pub const MAX_FIXES: usize = 10;
pub const MAX_IMPROVEMENTS: usize = 10;
pub const MAX_BREAKING: usize = 5;

/// Case-insensitive substring test against a keyword list.
fn mentions_any(subject_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| subject_lower.contains(keyword))
}

/// Bucket commit subjects by keyword.
///
/// Each bucket keeps commit order and is truncated to its limit. A subject
/// may land in several buckets; one matching nothing lands nowhere.
pub fn classify(commits: &[CommitEntry]) -> Classification {
    let mut classification = Classification::default();

    for commit in commits {
        let lower = commit.subject.to_lowercase();
        let buckets = [
            (&mut classification.features, FEATURE_KEYWORDS, MAX_FEATURES),
            (&mut classification.fixes, FIX_KEYWORDS, MAX_FIXES),
            (&mut classification.improvements, IMPROVEMENT_KEYWORDS, MAX_IMPROVEMENTS),
            (&mut classification.breaking, BREAKING_KEYWORDS, MAX_BREAKING),
        ];

        for (bucket, keywords, limit) in buckets {
            if bucket.len() < limit && mentions_any(&lower, keywords) {
                bucket.push(commit.subject.clone());
            }
        }
    }

    classification
}

/// Subjects that matched no category at all.
pub fn unclassified<'c>(commits: &'c [CommitEntry]) -> Vec<&'c str> {
    let all: Vec<&[&str]> = vec![
        FEATURE_KEYWORDS,
        FIX_KEYWORDS,
        IMPROVEMENT_KEYWORDS,
        BREAKING_KEYWORDS,
    ];
    commits
        .iter()
        .filter(|commit| {
            let lower = commit.subject.to_lowercase();
            !all.iter().any(|keywords| mentions_any(&lower, keywords))
        })
        .map(|commit| commit.subject.as_str())
        .collect()
}
