use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::{Captures, Regex};

pub const FEATURES_MARKER: &str = "## Features";

/// Replace every `MAJOR.MINOR.PATCH`-looking token with `version`.
///
/// Dotted numbers with more or fewer than three parts (dates, IP
/// addresses) are left alone. Returns the new text and the number of tokens
/// replaced.
pub fn replace_versions(text: &str, version: &Version) -> Result<(String, usize)> {
    let dotted = Regex::new(r"\d+(?:\.\d+)+").map_err(|e| ReleaseError::manifest(e.to_string()))?;
    let new_version = version.to_string();
    let mut replaced = 0;

    let out = dotted.replace_all(text, |caps: &Captures| {
        let token = &caps[0];
        if token.split('.').count() == 3 {
            replaced += 1;
            new_version.clone()
        } else {
            token.to_string()
        }
    });

    Ok((out.into_owned(), replaced))
}

/// Append bullets to the end of the `## Features` section.
///
/// Bullets already present in the section are not repeated. Returns `None`
/// when the document has no features section.
pub fn append_feature_bullets(text: &str, bullets: &str) -> Option<String> {
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.trim_end() == FEATURES_MARKER)?;
    let end = section_end(&lines, start + 1);

    let mut insert_at = end;
    while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
        insert_at -= 1;
    }

    let section = &lines[start..end];
    let additions: Vec<&str> = bullets
        .lines()
        .filter(|bullet| !bullet.trim().is_empty() && !section.contains(bullet))
        .collect();

    if additions.is_empty() {
        return Some(text.to_string());
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + additions.len() + 1);
    out.extend_from_slice(&lines[..insert_at]);
    if insert_at == start + 1 {
        out.push("");
    }
    out.extend(additions);
    out.extend_from_slice(&lines[insert_at..]);

    let mut joined = out.join(newline);
    if text.ends_with('\n') {
        joined.push_str(newline);
    }
    Some(joined)
}

/// Index of the next top-level heading at or after `from`. Lines inside
/// fenced code blocks never count as headings.
fn section_end(lines: &[&str], from: usize) -> usize {
    let mut in_fence = false;
    for (index, line) in lines.iter().enumerate().skip(from) {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        } else if !in_fence && (line.starts_with("## ") || line.starts_with("# ")) {
            return index;
        }
    }
    lines.len()
}
