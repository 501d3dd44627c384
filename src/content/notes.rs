use crate::domain::{Classification, DirectoryCounts, WatchedDir};

pub const INITIAL_RELEASE_BULLET: &str =
    "- Initial release with complete syntax highlighting, snippets, completions and tooling";
pub const SNIPPETS_BULLET: &str = "- New and updated snippets for faster template authoring";
pub const SYNTAXES_BULLET: &str = "- Improved syntax highlighting definitions";
pub const COMPLETIONS_BULLET: &str = "- Expanded auto-completions";
pub const FEATURES_BULLET: &str = "- New features and functionality";
pub const FIXES_BULLET: &str = "- Bug fixes and stability improvements";
pub const IMPROVEMENTS_BULLET: &str = "- Performance and usability improvements";
pub const MAINTENANCE_BULLET: &str = "- Maintenance release with internal improvements";

pub const README_SNIPPETS_BULLET: &str =
    "- **Snippets**: expanded snippet library for faster template authoring";
pub const README_SYNTAXES_BULLET: &str =
    "- **Syntax highlighting**: refined grammar rules for template tags, filters and expressions";
pub const README_COMPLETIONS_BULLET: &str =
    "- **Auto-completions**: more tags, filters and variables completed as you type";

/// The three text blocks synthesized for a release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseContent {
    /// Markdown bullet list; never empty
    pub notes_body: String,
    /// Bullets appended to the README features section; may be empty
    pub readme_bullets: String,
    /// One warning bullet per breaking commit; empty without breaking commits
    pub breaking_block: String,
}

impl ReleaseContent {
    /// Map a classification and directory counts to release text.
    ///
    /// Pure: the same inputs always give byte-identical output.
    pub fn synthesize(
        classification: &Classification,
        counts: &DirectoryCounts,
        initial_release: bool,
    ) -> Self {
        ReleaseContent {
            notes_body: notes_body(classification, counts, initial_release),
            readme_bullets: readme_bullets(counts, initial_release),
            breaking_block: breaking_block(&classification.breaking),
        }
    }

    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking_block.is_empty()
    }
}

fn notes_body(classification: &Classification, counts: &DirectoryCounts, initial: bool) -> String {
    if initial {
        return INITIAL_RELEASE_BULLET.to_string();
    }

    let gated = [
        (counts.get(WatchedDir::Snippets) > 0, SNIPPETS_BULLET),
        (counts.get(WatchedDir::Syntaxes) > 0, SYNTAXES_BULLET),
        (counts.get(WatchedDir::Completions) > 0, COMPLETIONS_BULLET),
        (!classification.features.is_empty(), FEATURES_BULLET),
        (!classification.fixes.is_empty(), FIXES_BULLET),
        (!classification.improvements.is_empty(), IMPROVEMENTS_BULLET),
    ];

    let bullets: Vec<&str> = gated
        .iter()
        .filter(|(fires, _)| *fires)
        .map(|(_, bullet)| *bullet)
        .collect();

    if bullets.is_empty() {
        MAINTENANCE_BULLET.to_string()
    } else {
        bullets.join("\n")
    }
}

fn readme_bullets(counts: &DirectoryCounts, initial: bool) -> String {
    if initial {
        return String::new();
    }

    [
        (WatchedDir::Snippets, README_SNIPPETS_BULLET),
        (WatchedDir::Syntaxes, README_SYNTAXES_BULLET),
        (WatchedDir::Completions, README_COMPLETIONS_BULLET),
    ]
    .iter()
    .filter(|(dir, _)| counts.get(*dir) > 0)
    .map(|(_, bullet)| *bullet)
    .collect::<Vec<_>>()
    .join("\n")
}

/// Pick the warning for one breaking commit from the words it uses.
fn breaking_warning(subject: &str) -> String {
    let lower = subject.to_lowercase();
    if lower.contains("scope") {
        format!(
            "- **Scope names changed**: update color schemes and settings that target the old scopes ({})",
            subject
        )
    } else if lower.contains("rename") {
        format!(
            "- **Configuration renamed**: check your user settings and key bindings ({})",
            subject
        )
    } else if lower.contains("remove") {
        format!("- **Removed**: {}", subject)
    } else {
        format!(
            "- **Structural change**: existing customizations may need adjusting ({})",
            subject
        )
    }
}

fn breaking_block(breaking: &[String]) -> String {
    breaking
        .iter()
        .map(|subject| breaking_warning(subject))
        .collect::<Vec<_>>()
        .join("\n")
}
