use crate::content::ReleaseContent;
use crate::domain::Version;
use crate::manifest::UpdatedFile;
use chrono::{DateTime, Utc};

/// Identity of the release being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseContext {
    pub display_name: String,
    pub version: Version,
    pub tag: String,
    pub previous_tag: Option<String>,
    /// Canonical `https://github.com/<owner>/<name>` URL
    pub repository_url: String,
    pub archive_name: String,
}

impl ReleaseContext {
    pub fn title(&self) -> String {
        format!("{} {}", self.display_name, self.tag)
    }

    pub fn compare_url(&self) -> Option<String> {
        self.previous_tag
            .as_ref()
            .map(|previous| format!("{}/compare/{}...{}", self.repository_url, previous, self.tag))
    }
}

/// Text shown by the editor after the package updates to this version.
pub fn message_file(
    ctx: &ReleaseContext,
    content: &ReleaseContent,
    generated_at: DateTime<Utc>,
) -> String {
    let title = ctx.title();
    let mut out = String::new();

    out.push_str(&title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push_str("\n\n");

    out.push_str("What's new\n----------\n\n");
    out.push_str(&content.notes_body);
    out.push_str("\n\n");

    if content.has_breaking_changes() {
        out.push_str("Breaking changes\n----------------\n\n");
        out.push_str(&content.breaking_block);
        out.push_str("\n\n");
    }

    out.push_str("Links\n-----\n\n");
    out.push_str(&format!("- Repository: {}\n", ctx.repository_url));
    out.push_str(&format!("- Issues: {}/issues\n", ctx.repository_url));
    out.push_str(&format!(
        "- Release: {}/releases/tag/{}\n\n",
        ctx.repository_url, ctx.tag
    ));
    out.push_str(&format!(
        "Generated on {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    out
}

/// Markdown body of the hosted release.
pub fn release_body(ctx: &ReleaseContext, content: &ReleaseContent) -> String {
    let mut sections = vec![
        format!("# {}", ctx.title()),
        format!("## What's New\n\n{}", content.notes_body),
    ];

    if content.has_breaking_changes() {
        sections.push(format!(
            "## ⚠️ Breaking Changes\n\n{}",
            content.breaking_block
        ));
    }

    sections.push(format!(
        "## Installation\n\n\
         ### Package Control\n\n\
         1. Open the Command Palette (`Ctrl+Shift+P` / `Cmd+Shift+P`)\n\
         2. Run **Package Control: Install Package**\n\
         3. Search for **{name}** and press Enter\n\n\
         ### Manual\n\n\
         1. Download `{archive}` from the assets below\n\
         2. Extract it into your Sublime Text `Packages` directory\n\
         3. Restart Sublime Text",
        name = ctx.display_name,
        archive = ctx.archive_name,
    ));

    let mut links = vec![
        format!("- [Repository]({})", ctx.repository_url),
        format!("- [Report an issue]({}/issues)", ctx.repository_url),
    ];
    if let Some(compare) = ctx.compare_url() {
        links.push(format!(
            "- [Full changelog: {}...{}]({})",
            ctx.previous_tag.as_deref().unwrap_or_default(),
            ctx.tag,
            compare
        ));
    }
    sections.push(format!("## Links\n\n{}", links.join("\n")));

    let mut body = sections.join("\n\n");
    body.push('\n');
    body
}

/// Multi-line commit message enumerating every rewritten file.
pub fn commit_message(ctx: &ReleaseContext, updated: &[UpdatedFile]) -> String {
    let mut message = format!("Release {}\n\nUpdated files:\n", ctx.tag);
    for file in updated {
        message.push_str(&format!("- {}: {}\n", file.path, file.description));
    }
    message
}

pub fn tag_message(ctx: &ReleaseContext, content: &ReleaseContent) -> String {
    format!("{}\n\n{}\n", ctx.title(), content.notes_body)
}
