use crate::domain::{TagPattern, WatchedDir};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "toolbox-release.toml";

/// Represents the complete configuration for toolbox-release.
///
/// Every table is optional; missing keys fall back to the layout of a
/// Sublime Text package published on GitHub.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub packaging: PackagingConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// Naming of the distributed package.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackageConfig {
    #[serde(default = "default_display_name")]
    pub display_name: String,

    /// Namespaced root folder inside the release archive
    #[serde(default = "default_archive_root")]
    pub archive_root: String,
}

fn default_display_name() -> String {
    "Nunjucks Toolbox".to_string()
}

fn default_archive_root() -> String {
    "NunjucksToolbox".to_string()
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            display_name: default_display_name(),
            archive_root: default_archive_root(),
        }
    }
}

/// Where the package lives and how it used to be referenced.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// GitHub owner; derived from the remote URL when empty
    #[serde(default)]
    pub owner: String,

    /// GitHub repository name; derived from the remote URL when empty
    #[serde(default)]
    pub name: String,

    /// Old repository URLs rewritten to the canonical one in the install message
    #[serde(default)]
    pub legacy_urls: Vec<String>,
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            remote: default_remote(),
            owner: String::new(),
            name: String::new(),
            legacy_urls: Vec::new(),
        }
    }
}

/// Repository-relative locations of every file the pipeline reads or writes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,
    #[serde(default = "default_readme")]
    pub readme: String,
    #[serde(default = "default_message_index")]
    pub message_index: String,
    #[serde(default = "default_messages_dir")]
    pub messages_dir: String,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    #[serde(default = "default_snippets")]
    pub snippets: String,
    #[serde(default = "default_syntaxes")]
    pub syntaxes: String,
    #[serde(default = "default_completions")]
    pub completions: String,
}

fn default_manifest() -> String {
    "package.json".to_string()
}
fn default_readme() -> String {
    "README.md".to_string()
}
fn default_message_index() -> String {
    "messages.json".to_string()
}
fn default_messages_dir() -> String {
    "messages".to_string()
}
fn default_dist_dir() -> String {
    "dist".to_string()
}
fn default_snippets() -> String {
    "Snippets".to_string()
}
fn default_syntaxes() -> String {
    "Syntaxes".to_string()
}
fn default_completions() -> String {
    "Completions".to_string()
}

impl PathsConfig {
    /// Directory name backing a watched category.
    pub fn watched(&self, dir: WatchedDir) -> &str {
        match dir {
            WatchedDir::Snippets => &self.snippets,
            WatchedDir::Syntaxes => &self.syntaxes,
            WatchedDir::Completions => &self.completions,
        }
    }

    /// Files the packager and manifest updater cannot do without.
    pub fn required_files(&self) -> [&str; 3] {
        [&self.manifest, &self.message_index, &self.readme]
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            manifest: default_manifest(),
            readme: default_readme(),
            message_index: default_message_index(),
            messages_dir: default_messages_dir(),
            dist_dir: default_dist_dir(),
            snippets: default_snippets(),
            syntaxes: default_syntaxes(),
            completions: default_completions(),
        }
    }
}

/// What goes into the distributable archive besides the required files.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PackagingConfig {
    #[serde(default = "default_directories")]
    pub directories: Vec<String>,

    #[serde(default = "default_optional_files")]
    pub optional_files: Vec<String>,
}

fn default_directories() -> Vec<String> {
    [
        "Commands",
        "Completions",
        "Keymaps",
        "Menus",
        "Preferences",
        "Settings",
        "Snippets",
        "Syntaxes",
        "messages",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_optional_files() -> Vec<String> {
    vec![
        "LICENSE".to_string(),
        "language-configuration.json".to_string(),
    ]
}

impl Default for PackagingConfig {
    fn default() -> Self {
        PackagingConfig {
            directories: default_directories(),
            optional_files: default_optional_files(),
        }
    }
}

/// Release host endpoints and credentials.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PublishConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_uploads_url")]
    pub uploads_url: String,

    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_uploads_url() -> String {
    "https://uploads.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Default for PublishConfig {
    fn default() -> Self {
        PublishConfig {
            api_url: default_api_url(),
            uploads_url: default_uploads_url(),
            token_env: default_token_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_pattern: default_tag_pattern(),
            package: PackageConfig::default(),
            repository: RepositoryConfig::default(),
            paths: PathsConfig::default(),
            packaging: PackagingConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag_pattern.clone())
    }

    /// Path of the per-release message file, relative to the repository root.
    pub fn message_file(&self, version: &crate::domain::Version) -> String {
        format!("{}/{}.txt", self.paths.messages_dir.trim_end_matches('/'), version)
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(content).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.tag_pattern()?;
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `toolbox-release.toml` in current directory
/// 3. `toolbox-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(PathBuf::from(path)),
        None => discover_config_file(),
    };

    match path {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                ReleaseError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            parse_config(&content)
        }
        None => Ok(Config::default()),
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(config.paths.watched(WatchedDir::Snippets), "Snippets");
        assert_eq!(config.paths.watched(WatchedDir::Syntaxes), "Syntaxes");
        assert_eq!(config.paths.watched(WatchedDir::Completions), "Completions");
        assert_eq!(
            config.paths.required_files(),
            ["package.json", "messages.json", "README.md"]
        );
    }

    #[test]
    fn test_message_file_path() {
        let config = Config::default();
        assert_eq!(config.message_file(&Version::new(1, 3, 0)), "messages/1.3.0.txt");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"
[repository]
owner = "acme"
name = "nunjucks-toolbox"
"#,
        )
        .unwrap();
        assert_eq!(config.repository.owner, "acme");
        assert_eq!(config.repository.remote, "origin");
        assert_eq!(config.paths, PathsConfig::default());
        assert_eq!(config.tag_pattern, "v{version}");
    }

    #[test]
    fn test_invalid_tag_pattern_rejected() {
        let err = parse_config("tag_pattern = \"latest\"").unwrap_err();
        assert!(err.to_string().contains("{version}"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = parse_config("[paths\nmanifest = 1").unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
    }
}
