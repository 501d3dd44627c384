/// One non-merge commit in the release range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    /// Abbreviated (7 character) commit hash
    pub hash: String,
    pub subject: String,
    pub body: String,
}

impl CommitEntry {
    pub const PLACEHOLDER_HASH: &'static str = "0000000";
    pub const PLACEHOLDER_SUBJECT: &'static str = "Initial release";

    pub fn new(hash: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        CommitEntry {
            hash: hash.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Split a raw commit message into subject (first line) and body.
    pub fn from_message(hash: impl Into<String>, message: &str) -> Self {
        let message = message.trim_end();
        let (subject, body) = match message.split_once('\n') {
            Some((subject, rest)) => (subject.trim_end(), rest.trim()),
            None => (message, ""),
        };
        CommitEntry::new(hash, subject, body)
    }

    /// Stand-in commit used when there is no previous release to diff against.
    pub fn placeholder() -> Self {
        CommitEntry::new(Self::PLACEHOLDER_HASH, Self::PLACEHOLDER_SUBJECT, "")
    }

    pub fn is_placeholder(&self) -> bool {
        self.hash == Self::PLACEHOLDER_HASH && self.subject == Self::PLACEHOLDER_SUBJECT
    }
}

/// Abbreviate a full object id the way `git log --oneline` does.
pub fn short_hash(full: &str) -> String {
    full.chars().take(7).collect()
}
