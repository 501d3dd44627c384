use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;

/// Rewrite the `version` field of a JSON package manifest.
///
/// The substitution is textual so the rest of the file keeps its layout.
pub fn set_version(manifest: &str, version: &Version) -> Result<String> {
    let parsed: serde_json::Value = serde_json::from_str(manifest)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| ReleaseError::manifest("package manifest must be a JSON object"))?;
    if !object.get("version").map(|v| v.is_string()).unwrap_or(false) {
        return Err(ReleaseError::manifest(
            "package manifest has no string 'version' field",
        ));
    }

    let field = Regex::new(r#""version"(\s*):(\s*)"[^"]*""#)
        .map_err(|e| ReleaseError::manifest(e.to_string()))?;
    let replacement = format!(r#""version"${{1}}:${{2}}"{}""#, version);
    let rewritten = field.replace(manifest, replacement.as_str()).into_owned();

    // The first "version" key may belong to a nested object.
    let check: serde_json::Value = serde_json::from_str(&rewritten)?;
    if check["version"] == serde_json::Value::String(version.to_string()) {
        return Ok(rewritten);
    }

    let mut fallback = parsed;
    fallback["version"] = serde_json::Value::String(version.to_string());
    let mut out = serde_json::to_string_pretty(&fallback)?;
    out.push('\n');
    Ok(out)
}
