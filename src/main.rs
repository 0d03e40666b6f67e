mod cli;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;
use tunedex_config::Config;
use tunedex_index::Database;
use tunedex_library::{Context, Extensions, Halt, MediaReport, OrphanReport, media_scan, orphan_scan};
use tunedex_tags::LoftyReader;

/// Conventional exit status for a process stopped by SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let halt = halt_on_ctrl_c();
    match run(cli, &halt).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            match halt.is_halted() {
                true => ExitCode::from(EXIT_INTERRUPTED),
                false => ExitCode::FAILURE,
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let default = match verbose {
        true => "info,tunedex=debug,tunedex_config=debug,tunedex_index=debug,tunedex_library=debug,tunedex_tags=debug",
        false => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// First Ctrl-C halts the running scan after its current step.
fn halt_on_ctrl_c() -> Halt {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; stopping after the current step");
            _ = tx.send(());
        }
    });
    Halt::listen(rx)
}

async fn run(cli: Cli, halt: &Halt) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    let verbose = cli.verbose || config.verbose;

    let db = open(&config.database).await?;
    let extensions = Extensions::new(&config.library.audio_extensions, &config.library.art_extensions);
    let ctx = Context::new(db.repository(), Arc::new(LoftyReader)).with_extensions(extensions);
    let result = execute(cli.command, &ctx, &config, verbose, halt).await;
    db.close().await;
    result
}

async fn execute(command: Command, ctx: &Context, config: &Config, verbose: bool, halt: &Halt) -> Result<()> {
    match command {
        Command::Scan { root } => {
            let root = library_root(root, config)?;
            scan(ctx, &root, verbose, halt).await
        },
        Command::Orphans { base, sub } => {
            let base = base.or_else(|| config.library.root.clone());
            orphans(ctx, base.as_deref(), sub.as_deref(), verbose, halt).await
        },
        Command::Sync => {
            let root = library_root(None, config)?;
            scan(ctx, &root, verbose, halt).await?;
            orphans(ctx, Some(root.as_path()), None, verbose, halt).await
        },
        Command::Stats => stats(ctx).await,
    }
}

async fn open(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    }
    Database::connect(path).await.or_raise(|| ErrorKind::Open(path.to_path_buf()))
}

fn library_root(explicit: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    explicit.or_else(|| config.library.root.clone()).ok_or_raise(|| ErrorKind::NoRoot)
}

async fn scan(ctx: &Context, root: &Path, verbose: bool, halt: &Halt) -> Result<()> {
    let report = media_scan(ctx, root, verbose, halt).await.or_raise(|| ErrorKind::MediaScan)?;
    let MediaReport { art, artists, albums, songs, updated, folders } = report;
    println!(
        "scan: {} changes (added {songs} songs, {albums} albums, {artists} artists, {art} art, {folders} folders; \
         updated {updated} songs)",
        report.total()
    );
    Ok(())
}

async fn orphans(ctx: &Context, base: Option<&Path>, sub: Option<&Path>, verbose: bool, halt: &Halt) -> Result<()> {
    let report = orphan_scan(ctx, base, sub, verbose, halt).await.or_raise(|| ErrorKind::OrphanScan)?;
    let OrphanReport { art, artists, albums, songs, folders } = report;
    println!(
        "orphans: {} removed ({songs} songs, {albums} albums, {artists} artists, {art} art, {folders} folders)",
        report.total()
    );
    Ok(())
}

async fn stats(ctx: &Context) -> Result<()> {
    let totals = ctx.index.totals().await.or_raise(|| ErrorKind::Index)?;
    println!("folders  {:>8}", totals.folders);
    println!("artists  {:>8}", totals.artists);
    println!("albums   {:>8}", totals.albums);
    println!("songs    {:>8}", totals.songs);
    println!("art      {:>8}", totals.art);
    Ok(())
}
