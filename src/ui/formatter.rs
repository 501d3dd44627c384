//! Pure formatting functions for UI output.
//!
//! Everything here prints; nothing reads input. Styling goes through
//! `console`, which drops colors when the stream is not a terminal.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::content::ReleaseContent;
use crate::domain::{ChangeSet, Classification};
use crate::validate::{Finding, FindingLevel};

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_WIDTH: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Header for one pipeline stage, e.g. `[2/7] Analyzing changes`.
pub fn display_step(number: usize, total: usize, title: &str) {
    println!(
        "\n{} {}",
        style(format!("[{}/{}]", number, total)).dim(),
        style(title).bold()
    );
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Shorten a commit subject to `width` characters, marking the cut.
pub fn truncate_subject(subject: &str, width: usize) -> String {
    if subject.chars().count() <= width {
        return subject.to_string();
    }
    let mut short: String = subject.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Commit range, listed commits and per-directory counts.
pub fn display_change_summary(changes: &ChangeSet) {
    match &changes.previous_tag {
        Some(tag) => println!(
            "  {} commit(s) since {}, {} file(s) changed",
            changes.commits.len(),
            style(tag).cyan(),
            changes.changed_paths.len()
        ),
        None => println!(
            "  Initial release, {} configuration file(s) in the working tree",
            changes.changed_paths.len()
        ),
    }

    for commit in changes.commits.iter().take(MAX_LISTED_COMMITS) {
        println!(
            "    {} {}",
            style(&commit.hash).dim(),
            truncate_subject(&commit.subject, MAX_SUBJECT_WIDTH)
        );
    }
    if changes.commits.len() > MAX_LISTED_COMMITS {
        println!(
            "    ... and {} more commits",
            changes.commits.len() - MAX_LISTED_COMMITS
        );
    }

    let counts: Vec<String> = changes
        .directory_counts
        .iter()
        .map(|(dir, count)| format!("{} {}", dir, count))
        .collect();
    println!("  Watched directories: {}", counts.join(", "));
}

/// Bucket sizes followed by the subjects in each non-empty bucket.
pub fn display_classification(classification: &Classification) {
    let buckets = [
        ("Features", &classification.features),
        ("Fixes", &classification.fixes),
        ("Improvements", &classification.improvements),
        ("Breaking", &classification.breaking),
    ];

    for (name, subjects) in buckets {
        println!("  {}: {}", style(name).bold(), subjects.len());
        for subject in subjects {
            println!("    - {}", truncate_subject(subject, MAX_SUBJECT_WIDTH));
        }
    }
}

/// The synthesized notes, README bullets and breaking block.
pub fn display_release_content(content: &ReleaseContent) {
    println!("\n{}", style("Release notes").underlined());
    println!("{}", content.notes_body);

    println!("\n{}", style("README feature bullets").underlined());
    if content.readme_bullets.is_empty() {
        println!("{}", style("(none)").dim());
    } else {
        println!("{}", content.readme_bullets);
    }

    if content.has_breaking_changes() {
        println!("\n{}", style("Breaking changes").red().underlined());
        println!("{}", content.breaking_block);
    }
}

pub fn display_findings(findings: &[Finding]) {
    for finding in findings {
        let marker = match finding.level {
            FindingLevel::Ok => style("✓").green(),
            FindingLevel::Warning => style("⚠").yellow(),
            FindingLevel::Error => style("✗").red(),
        };
        println!("  {} {}: {}", marker, finding.path, finding.message);
    }
}

/// Shows the git command that finishes a release prepared with `--no-publish`.
pub fn display_manual_publish_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To publish later, commit the updated files, then run:\n  {}",
        style("→").yellow(),
        style(format!(
            "git tag -a {tag} -m {tag} && git push {remote} HEAD {tag}",
            tag = tag,
            remote = remote
        ))
        .cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_subject_short() {
        assert_eq!(truncate_subject("fix: typo", 60), "fix: typo");
    }

    #[test]
    fn test_truncate_subject_long() {
        let subject = "feat: ".to_string() + &"x".repeat(80);
        let short = truncate_subject(&subject, 60);
        assert_eq!(short.chars().count(), 60);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn test_truncate_subject_multibyte() {
        let subject = "ä".repeat(70);
        assert_eq!(truncate_subject(&subject, 10).chars().count(), 10);
    }

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_step() {
        display_step(1, 7, "Resolving version");
    }
}
