use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use braulio::cli::{run_init, run_release, InitOutcome, ReleaseArgs, ReleaseStatus};
use braulio::config::{self, CONFIG_FILE};
use braulio::domain::{LabelPosition, ReleaseTarget};
use braulio::git::Git2Repository;
use braulio::ui::{self, TerminalPrompter};
use braulio::VersionBump;

#[derive(Parser)]
#[command(
    name = "brau",
    version,
    about = "Release a new version from labelled git commits"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Print debug logs")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find or create the changelog file
    Init {
        #[arg(long, help = "Changelog file name")]
        changelog_file: Option<PathBuf>,
    },
    /// Update the changelog and version files, then commit and tag
    Release(ReleaseFlags),
}

#[derive(clap::Args)]
struct ReleaseFlags {
    #[arg(long, conflicts_with_all = ["minor", "patch", "bump"], help = "Force a major release")]
    major: bool,

    #[arg(long, conflicts_with_all = ["patch", "bump"], help = "Force a minor release")]
    minor: bool,

    #[arg(long, conflicts_with = "bump", help = "Force a patch release")]
    patch: bool,

    #[arg(long, value_name = "VERSION", help = "Release exactly this version")]
    bump: Option<String>,

    #[arg(long, help = "Release into this stage (dev, beta, final, ...)")]
    stage: Option<String>,

    #[arg(long, overrides_with = "no_commit", help = "Commit the release")]
    commit: bool,

    #[arg(long, overrides_with = "commit", help = "Do not commit the release")]
    no_commit: bool,

    #[arg(long, overrides_with = "no_tag", help = "Tag the release")]
    tag: bool,

    #[arg(long, overrides_with = "tag", help = "Do not tag the release")]
    no_tag: bool,

    #[arg(short = 'y', long = "yes", help = "Skip the confirmation prompt")]
    confirm: bool,

    #[arg(long, help = "Changelog file")]
    changelog_file: Option<PathBuf>,

    #[arg(long, help = "Label convention, e.g. \"!{action}:{scope}\"")]
    label_pattern: Option<String>,

    #[arg(long, help = "Where labels live: header or footer")]
    label_position: Option<String>,

    #[arg(long, help = "Tag naming pattern, e.g. \"v{version}\"")]
    tag_pattern: Option<String>,

    #[arg(long, help = "Version of the last release")]
    current_version: Option<String>,

    #[arg(help = "Files whose version string is updated")]
    files: Vec<PathBuf>,
}

impl ReleaseFlags {
    fn target(&self) -> Option<ReleaseTarget> {
        if self.major {
            Some(ReleaseTarget::Bump(VersionBump::Major))
        } else if self.minor {
            Some(ReleaseTarget::Bump(VersionBump::Minor))
        } else if self.patch {
            Some(ReleaseTarget::Bump(VersionBump::Patch))
        } else {
            self.bump.clone().map(ReleaseTarget::Exact)
        }
    }
}

/// An on/off flag pair over a configured value
fn switch(on: bool, off: bool, configured: bool) -> bool {
    if off {
        false
    } else {
        on || configured
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn release(config_path: Option<&Path>, flags: ReleaseFlags) -> Result<()> {
    let config = config::load_config(config_path).context("Error loading config")?;
    let stages = config.stages()?;

    let mut args = ReleaseArgs::from_config(&config);
    args.target = flags.target();
    args.stage = flags.stage.clone();
    args.commit = switch(flags.commit, flags.no_commit, config.release.commit);
    args.tag = switch(flags.tag, flags.no_tag, config.release.tag);
    args.confirm = flags.confirm || config.release.confirm;

    if let Some(changelog_file) = flags.changelog_file {
        args.changelog_file = changelog_file;
    }
    if let Some(pattern) = flags.label_pattern {
        args.label_pattern = pattern;
    }
    if let Some(position) = flags.label_position {
        args.label_position = position.parse::<LabelPosition>()?;
    }
    if let Some(pattern) = flags.tag_pattern {
        args.tag_pattern = pattern;
    }
    if !flags.files.is_empty() {
        args.files = flags.files;
    }

    match flags.current_version {
        Some(current) => args.current_version = Some(current),
        None if config.release.current_version.is_some() => {
            args.rewrite_config = config::find_config_path(config_path);
        }
        None => {}
    }

    let repo = Git2Repository::open(".").context("Not inside a git repository")?;
    let report = run_release(&repo, &args, &stages, &TerminalPrompter)?;

    for warning in &report.warnings {
        ui::display_boundary_warning(warning);
    }

    match report.status {
        ReleaseStatus::NothingToRelease => ui::display_status("Nothing to release"),
        ReleaseStatus::Aborted => ui::display_status("Release aborted"),
        ReleaseStatus::Released(outcome) => {
            ui::display_success(&format!("Released version {}", outcome.new));
            if let Some(tag) = outcome.tag {
                ui::display_status(&format!("Created tag {}", tag));
            }
        }
    }

    Ok(())
}

fn init(config_path: Option<&Path>, changelog_file: Option<PathBuf>) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    ui::display_status("Initializing changelog");

    match run_init(
        Path::new("."),
        changelog_file.as_deref(),
        &config_path,
        &TerminalPrompter,
    )? {
        InitOutcome::Found(path) => ui::display_success(&format!("{} file found", path.display())),
        InitOutcome::Created(path) => {
            ui::display_success(&format!("{} created successfully", path.display()))
        }
        InitOutcome::Declined => ui::display_status("No changelog created"),
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Command::Init { changelog_file } => init(cli.config.as_deref(), changelog_file),
        Command::Release(flags) => release(cli.config.as_deref(), flags),
    };

    if let Err(e) = result {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
