use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

pub const INSTALL_KEY: &str = "install";

/// Key of a message-index entry, ordered the way the index is written out:
/// `install`, then versions ascending, then anything else.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageKey {
    Install,
    /// Parsed version plus the key exactly as written
    Version(Version, String),
    Other(String),
}

impl MessageKey {
    pub fn parse(key: &str) -> Self {
        if key == INSTALL_KEY {
            return MessageKey::Install;
        }
        match Version::parse(key) {
            Ok(version) => MessageKey::Version(version, key.to_string()),
            Err(_) => MessageKey::Other(key.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageKey::Install => INSTALL_KEY,
            MessageKey::Version(_, raw) | MessageKey::Other(raw) => raw,
        }
    }
}

/// The editor's map from version to release-message file.
///
/// A value type: updates return a new index rather than mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageIndex {
    entries: BTreeMap<MessageKey, String>,
}

impl MessageIndex {
    /// Parse a JSON object whose values are all strings.
    pub fn parse(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| ReleaseError::manifest("message index must be a JSON object"))?;

        let mut entries = BTreeMap::new();
        for (key, path) in object {
            let path = path.as_str().ok_or_else(|| {
                ReleaseError::manifest(format!("message index entry '{}' must be a string", key))
            })?;
            entries.insert(MessageKey::parse(key), path.to_string());
        }

        Ok(MessageIndex { entries })
    }

    /// Index with `version` mapped to `path`, replacing any previous entry.
    pub fn with_version(&self, version: &Version, path: impl Into<String>) -> Self {
        let mut entries: BTreeMap<MessageKey, String> = self
            .entries
            .iter()
            .filter(|(key, _)| !matches!(key, MessageKey::Version(v, _) if v == version))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        entries.insert(
            MessageKey::Version(version.clone(), version.to_string()),
            path.into(),
        );
        MessageIndex { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&MessageKey::parse(key)).map(String::as_str)
    }

    pub fn install_path(&self) -> Option<&str> {
        self.entries.get(&MessageKey::Install).map(String::as_str)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(MessageKey::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON in index order, with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

impl Serialize for MessageIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, path) in &self.entries {
            map.serialize_entry(key.as_str(), path)?;
        }
        map.end()
    }
}
