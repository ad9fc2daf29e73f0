use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Partitioned k-nearest-neighbor classifier.
#[derive(Parser)]
#[command(
    name = "partknn",
    version,
    about = "Partitioned k-nearest-neighbor classifier"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Rank, merge and vote in one process.
    Classify(ClassifyArgs),
    /// Rank one partition file and write its candidate file.
    Rank(RankArgs),
    /// Merge candidate files and vote on the label.
    Merge(MergeArgs),
}

/// Where the query and K come from.
#[derive(clap::Args)]
pub struct QueryArgs {
    /// Path to TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// One-line parameter file `k,q_0,...,q_{n-1}`; overrides `k` and `query`
    /// from the config.
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Override the number of neighbors.
    #[arg(short, long)]
    pub k: Option<usize>,
}

/// Arguments for the `classify` subcommand.
#[derive(clap::Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Training data files, read in order.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Result path. Writes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the number of data partitions from config.
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Also write the K neighbors as `distance<TAB>label` lines.
    #[arg(long)]
    pub neighbors: bool,

    /// Path for a JSON report of the run.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the `rank` subcommand.
#[derive(clap::Args)]
pub struct RankArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Partition data file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Candidate file to write.
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the `merge` subcommand.
#[derive(clap::Args)]
pub struct MergeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Candidate files, one per partition. All of them must be present.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Result path. Writes to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the K neighbors as `distance<TAB>label` lines.
    #[arg(long)]
    pub neighbors: bool,

    /// Path for a JSON report of the run.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
