use anyhow::Result;
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};

use toolbox_release::cli::{self, ReleaseArgs, ReleaseStatus};
use toolbox_release::config::{self, Config};
use toolbox_release::domain::Version;
use toolbox_release::git::{Git2Repository, Repository};
use toolbox_release::publish::{self, GitHubReleases};
use toolbox_release::{ui, validate};

#[derive(clap::Parser)]
#[command(
    name = "toolbox-release",
    about = "Cut, package and publish releases of a Sublime Text package"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Print version information")]
    version: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the release pipeline for VERSION (MAJOR.MINOR.PATCH)
    Release {
        #[arg(value_name = "VERSION")]
        release_version: String,

        #[arg(long, help = "Preview notes and classification without changing anything")]
        dry_run: bool,

        #[arg(long, help = "Skip package validation before rewriting files")]
        no_verify: bool,

        #[arg(long, help = "Rewrite files and build the archive, but do not commit, tag, push or release")]
        no_publish: bool,

        #[arg(short = 'y', long, help = "Skip the confirmation prompt before publishing")]
        yes: bool,
    },

    /// Check the package's JSON and YAML files
    Validate,

    /// Print the release notes and release body for VERSION without side effects
    Notes {
        #[arg(value_name = "VERSION")]
        release_version: String,
    },
}

fn main() {
    if let Err(e) = run() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("toolbox-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let config = config::load_config(args.config.as_deref())?;

    match command {
        Command::Release {
            release_version,
            dry_run,
            no_verify,
            no_publish,
            yes,
        } => release(
            ReleaseArgs {
                version: release_version,
                dry_run,
                no_verify,
                no_publish,
                assume_yes: yes,
            },
            &config,
        ),
        Command::Validate => validate_package(&config),
        Command::Notes { release_version } => notes(&release_version, &config),
    }
}

fn open_repository(config: &Config) -> Result<Git2Repository> {
    let token = std::env::var(&config.publish.token_env).ok();
    Ok(Git2Repository::open(".")?.with_https_token(token))
}

fn release(args: ReleaseArgs, config: &Config) -> Result<()> {
    // Reject a malformed version before opening anything
    Version::parse(&args.version)?;

    let repo = open_repository(config)?;
    let host = GitHubReleases::new(&config.publish, publish::resolve_slug(config, &repo)?);

    let outcome = cli::run_release(&args, config, &repo, &host, Utc::now(), |prompt| {
        ui::confirm_action(prompt).unwrap_or(false)
    })?;

    let tag = &outcome.prepared.context.tag;
    match outcome.status {
        ReleaseStatus::DryRun => ui::display_status(&format!("Dry run for {} complete", tag)),
        ReleaseStatus::Packaged => ui::display_success(&format!("{} prepared locally", tag)),
        ReleaseStatus::Cancelled => println!("Operation cancelled by user."),
        ReleaseStatus::Published => {
            println!("\n{} Successfully released {}\n", console::style("✓").green(), tag)
        }
    }
    Ok(())
}

fn validate_package(config: &Config) -> Result<()> {
    // Same root the release gate checks, even when run from a subdirectory
    let repo = Git2Repository::open(".")?;
    let report = validate::validate_package(repo.workdir(), config);
    ui::display_findings(&report.findings);
    report.into_result()?;
    ui::display_success("Package files are valid");
    Ok(())
}

fn notes(version: &str, config: &Config) -> Result<()> {
    Version::parse(version)?;

    let repo = open_repository(config)?;
    let prepared = cli::prepare_release(version, config, &repo)?;
    ui::display_release_content(&prepared.content);
    println!("\n{}\n", console::style("Release body").underlined());
    print!("{}", prepared.release_body());
    Ok(())
}
