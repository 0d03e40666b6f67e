use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tunedex", version, about = "Index a music library into SQLite and keep it in sync")]
pub struct Cli {
    /// Config file (TOML, YAML or JSON). Defaults to `config.toml` in the
    /// platform config directory, if present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Index database, overriding the configured one.
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,
    /// Log scan progress, counts and timings.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add new and changed files under ROOT to the index.
    Scan {
        /// Defaults to the configured library root.
        root: Option<PathBuf>,
    },
    /// Remove index records whose files no longer exist.
    Orphans {
        /// Remove everything outside this directory. Defaults to the
        /// configured library root.
        #[arg(long, value_name = "PATH")]
        base: Option<PathBuf>,
        /// Only check files below this directory. Defaults to the base.
        #[arg(long, value_name = "PATH")]
        sub: Option<PathBuf>,
    },
    /// Scan the configured library root, then remove orphans.
    Sync,
    /// Print the number of records of each kind.
    Stats,
}
