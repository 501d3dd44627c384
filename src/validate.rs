//! Structural checks over the package's JSON and YAML configuration files.
//!
//! Run on demand and as a gate before a release rewrites anything.

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingLevel {
    Ok,
    Warning,
    Error,
}

/// The outcome of checking one file (or one missing directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    pub level: FindingLevel,
    pub message: String,
}

impl Finding {
    fn ok(path: &str, message: impl Into<String>) -> Self {
        Finding {
            path: path.to_string(),
            level: FindingLevel::Ok,
            message: message.into(),
        }
    }

    fn warning(path: &str, message: impl Into<String>) -> Self {
        Finding {
            path: path.to_string(),
            level: FindingLevel::Warning,
            message: message.into(),
        }
    }

    fn error(path: &str, message: impl Into<String>) -> Self {
        Finding {
            path: path.to_string(),
            level: FindingLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.level == FindingLevel::Error)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// `Err(Validation)` listing every error finding, if there are any.
    pub fn into_result(self) -> Result<()> {
        let errors: Vec<String> = self
            .errors()
            .map(|f| format!("{}: {}", f.path, f.message))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReleaseError::validation(errors.join("; ")))
        }
    }
}

/// Check manifest, message index, completions, snippet collections and
/// syntax definitions below `root`.
pub fn validate_package(root: &Path, config: &Config) -> ValidationReport {
    let paths = &config.paths;
    let mut findings = vec![
        check_json_file(root, &paths.manifest, check_manifest),
        check_json_file(root, &paths.message_index, check_message_index),
    ];

    findings.extend(check_directory(
        root,
        &paths.completions,
        ".sublime-completions",
        |path, text| parse_json(text).and_then(|value| check_completions(&value)).map_err(|e| (path, e)),
    ));
    findings.extend(check_directory(
        root,
        &paths.snippets,
        ".sublime-snippets",
        |path, text| parse_json(text).and_then(|value| check_snippets(&value)).map_err(|e| (path, e)),
    ));
    findings.extend(check_directory(
        root,
        &paths.syntaxes,
        ".sublime-syntax",
        |path, text| check_syntax(text).map_err(|e| (path, e)),
    ));

    ValidationReport { findings }
}

fn check_json_file(root: &Path, relative: &str, check: fn(&Value) -> std::result::Result<String, String>) -> Finding {
    let text = match fs::read_to_string(root.join(relative)) {
        Ok(text) => text,
        Err(_) => return Finding::error(relative, "file not found"),
    };
    match parse_json(&text).and_then(|value| check(&value)) {
        Ok(summary) => Finding::ok(relative, summary),
        Err(message) => Finding::error(relative, message),
    }
}

/// Run `check` over every file in `dir` whose name ends with `suffix`.
fn check_directory<F>(root: &Path, dir: &str, suffix: &str, check: F) -> Vec<Finding>
where
    F: Fn(String, &str) -> std::result::Result<String, (String, String)>,
{
    let base = root.join(dir);
    if !base.is_dir() {
        return vec![Finding::warning(dir, "directory not found")];
    }

    let mut findings = Vec::new();
    for entry in WalkDir::new(&base).sort_by_file_name().into_iter().flatten() {
        let name = entry.file_name().to_string_lossy();
        if !entry.file_type().is_file() || !name.ends_with(suffix) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|_| entry.path().to_string_lossy().into_owned());

        let finding = match fs::read_to_string(entry.path()) {
            Ok(text) => match check(relative.clone(), &text) {
                Ok(summary) => Finding::ok(&relative, summary),
                Err((path, message)) => Finding::error(&path, message),
            },
            Err(e) => Finding::error(&relative, format!("cannot read: {}", e)),
        };
        findings.push(finding);
    }
    findings
}

fn parse_json(text: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(text).map_err(|e| format!("JSON syntax error: {}", e))
}

fn check_manifest(value: &Value) -> std::result::Result<String, String> {
    let object = value.as_object().ok_or("must be a JSON object")?;
    let missing: Vec<&str> = ["name", "version", "description"]
        .into_iter()
        .filter(|field| !object.get(*field).map(Value::is_string).unwrap_or(false))
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing or non-string fields: {}", missing.join(", ")));
    }
    Ok(format!(
        "name {}, version {}",
        object["name"].as_str().unwrap_or_default(),
        object["version"].as_str().unwrap_or_default()
    ))
}

fn check_message_index(value: &Value) -> std::result::Result<String, String> {
    let object = value.as_object().ok_or("must be a JSON object")?;
    if let Some((key, _)) = object.iter().find(|(_, v)| !v.is_string()) {
        return Err(format!("entry '{}' must be a string path", key));
    }
    Ok(format!("{} message entries", object.len()))
}

fn check_completions(value: &Value) -> std::result::Result<String, String> {
    let object = value.as_object().ok_or("must be a JSON object")?;
    if !object.contains_key("scope") {
        return Err("missing 'scope' field".to_string());
    }
    let completions = object
        .get("completions")
        .and_then(Value::as_array)
        .ok_or("'completions' must be an array")?;

    for (i, completion) in completions.iter().enumerate() {
        match completion {
            Value::String(_) => {}
            Value::Object(fields) => {
                for required in ["trigger", "contents"] {
                    if !fields.contains_key(required) {
                        return Err(format!("completion {}: missing '{}'", i, required));
                    }
                }
            }
            _ => return Err(format!("completion {}: must be a string or an object", i)),
        }
    }
    Ok(format!("{} completions", completions.len()))
}

fn check_snippets(value: &Value) -> std::result::Result<String, String> {
    let object = value.as_object().ok_or("must be a JSON object")?;
    if !object.contains_key("scope") {
        return Err("missing 'scope' field".to_string());
    }
    let snippets = object
        .get("snippets")
        .and_then(Value::as_array)
        .ok_or("'snippets' must be an array")?;

    for (i, snippet) in snippets.iter().enumerate() {
        let fields = snippet
            .as_object()
            .ok_or_else(|| format!("snippet {}: must be an object", i))?;
        for required in ["trigger", "contents"] {
            if !fields.contains_key(required) {
                return Err(format!("snippet {}: missing '{}'", i, required));
            }
        }
    }
    Ok(format!("{} snippets", snippets.len()))
}

fn check_syntax(text: &str) -> std::result::Result<String, String> {
    let syntax: serde_yml::Value =
        serde_yml::from_str(text).map_err(|e| format!("YAML syntax error: {}", e))?;

    let missing: Vec<&str> = ["name", "file_extensions", "scope", "contexts"]
        .into_iter()
        .filter(|key| syntax.get(*key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing syntax keys: {}", missing.join(", ")));
    }

    let contexts = &syntax["contexts"];
    if contexts.get("main").is_none() {
        return Err("missing 'main' context".to_string());
    }
    let count = contexts.as_mapping().map(|m| m.len()).unwrap_or(0);
    Ok(format!("{} contexts", count))
}
