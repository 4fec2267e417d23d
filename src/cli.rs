use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "filmpulse",
    version,
    about = "Film discoverability scoring and analysis CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log errors only; reports are still printed
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding filmpulse.toml and the default score store
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Score store file, overriding [store] path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a film manifest and compute its discoverability
    Analyze(AnalyzeCommand),
    /// Print the latest stored result for a film
    Show(ShowCommand),
    /// List every analyzed film
    List,
    /// Delete a film's stored result
    Remove(RemoveCommand),
    /// Analyze every manifest under a directory
    Batch(BatchCommand),
}

#[derive(Args)]
pub struct AnalyzeCommand {
    pub manifest: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    /// Sentiment hype score, 0-100
    #[arg(long)]
    pub hype: Option<f64>,
    /// Audience-model genre fit, 0-1
    #[arg(long)]
    pub genre_affinity: Option<f64>,
    /// Release slot crowding, 0-1
    #[arg(long)]
    pub crowding: Option<f64>,
    /// Release window fit, 0-1
    #[arg(long)]
    pub release_fit: Option<f64>,
    /// Compute and print without storing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ShowCommand {
    pub film_id: String,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RemoveCommand {
    pub film_id: String,
}

#[derive(Args)]
pub struct BatchCommand {
    pub dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
