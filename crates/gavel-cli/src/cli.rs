//! CLI argument definitions for Gavel.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gavel_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "gavel",
    version,
    about = "Resolve Maven coordinates to their full transitive dependency set",
    long_about = "Gavel reads group:artifact:version seeds, walks their POM descriptors \
                  (parents, BOM imports, managed versions, exclusions) against a Maven \
                  repository, and writes every coordinate required at compile and runtime."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the seeds in the input file and write the result
    Resolve {
        /// Config file with `name = value` lines
        #[arg(short, long, default_value = "config.txt")]
        config: PathBuf,
        /// Seed file, one group:artifact:version per line
        #[arg(short, long, default_value = "input.txt")]
        input: PathBuf,
        /// Output file, or `-` for stdout
        #[arg(short, long, default_value = "output.txt")]
        output: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },

    /// Print the repository path and descriptor URL of a coordinate
    Path {
        /// Coordinate as group:artifact:version
        coordinate: String,
        /// Config file to take the repository from, if present
        #[arg(short, long, default_value = "config.txt")]
        config: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Flags that take precedence over the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct OverrideArgs {
    /// Repository base URL (https://... or file://...)
    #[arg(long, env = "GAVEL_REPO_URL")]
    pub repo_url: Option<String>,
    /// Repository username
    #[arg(long, env = "GAVEL_USERNAME")]
    pub username: Option<String>,
    /// Repository password or token
    #[arg(long, env = "GAVEL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Maximum concurrent descriptor fetches
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Refuse coordinates more than this many edges from a seed
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Stop at the first failure and write nothing
    #[arg(long)]
    pub fail_fast: bool,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            repo_url: args.repo_url,
            username: args.username,
            password: args.password,
            timeout_secs: args.timeout,
            jobs: args.jobs,
            max_depth: args.max_depth,
            fail_fast: args.fail_fast,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
