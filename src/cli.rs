use crate::domain::models::Environment;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "envstamp",
    version,
    about = "Resolve the deployment environment from the current branch and stamp the app identity into platform config files"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Project root containing pubspec.yaml, android/ and ios/"
    )]
    pub root: PathBuf,
    #[arg(long, global = true, help = "Settings file (default: <root>/envstamp.toml)")]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    #[arg(long, value_enum, help = "Force an environment instead of classifying the branch")]
    pub env: Option<Environment>,
    #[arg(long, help = "Classify this branch instead of asking git")]
    pub branch: Option<String>,
    #[arg(long, help = "Base identity (default: name field of pubspec.yaml)")]
    pub base: Option<String>,
    #[arg(long, help = "Organization prefix, e.g. com.acme")]
    pub org: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify the branch and print the derived identifiers without writing.
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },
    /// Stamp the derived identifiers into every target file and copy templates.
    Apply {
        #[command(flatten)]
        args: ResolveArgs,
        #[arg(long, default_value_t = false)]
        skip_templates: bool,
        #[arg(long, default_value_t = false, help = "Exit 1 when any file or template failed")]
        strict: bool,
    },
    /// Copy the per-environment Firebase templates into place.
    Templates {
        #[arg(value_enum)]
        env: Option<Environment>,
        #[arg(long)]
        branch: Option<String>,
    },
    /// Configure a project freshly created from the template.
    Init {
        #[arg(long)]
        name: String,
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        org: String,
    },
    /// Post-publish helpers: release history, QA checklist, chat notification.
    Release {
        #[command(subcommand)]
        command: ReleaseCommands,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// android or ios
    pub platform: String,
    #[arg(value_name = "VERSION")]
    pub release_version: String,
    #[arg(value_name = "BUILD_NUMBER")]
    pub build: String,
    #[arg(long, default_value = "- No changelog available", allow_hyphen_values = true)]
    pub changelog: String,
}

#[derive(Subcommand, Debug)]
pub enum ReleaseCommands {
    /// Append release metadata to logs/release_history.json.
    Log {
        #[command(flatten)]
        args: ReleaseArgs,
    },
    /// Write a QA checklist for the release.
    Qa {
        #[command(flatten)]
        args: ReleaseArgs,
    },
    /// Post the release message to the configured chat webhook.
    Notify {
        #[command(flatten)]
        args: ReleaseArgs,
    },
}
