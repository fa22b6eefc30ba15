use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use floortrack::api::TrackerApi;
use floortrack::commands::TrackerPaths;
use floortrack::config::TrackConfig;
use floortrack::error::Result;
use floortrack::store::fs::FileStore;
use std::io::{self, BufRead};
use std::path::PathBuf;

mod args;
mod cli;

use args::{Cli, Commands};
use cli::print::{print_result, print_scan_error, print_totals};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: TrackerApi<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Summary) => handle_summary(&ctx),
        Some(Commands::Merge { output }) => handle_merge(&ctx, output),
        Some(Commands::Export { files, out_dir }) => handle_export(&ctx, files, out_dir),
        Some(Commands::Scan) | None => handle_scan_loop(&mut ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("com", "floortrack", "floortrack")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let paths = TrackerPaths::new(data_dir);
    let config = TrackConfig::load(&paths.data_dir).unwrap_or_default();
    let store = FileStore::new(paths.clone());

    Ok(AppContext {
        api: TrackerApi::new(store, paths, config),
    })
}

/// The scanner feeds lines to stdin; every outcome keeps the loop alive.
fn handle_scan_loop(ctx: &mut AppContext) -> Result<()> {
    println!("{}", "Please scan a label".dimmed());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match ctx.api.scan(&line) {
            Ok(result) => print_result(&result),
            Err(e) => print_scan_error(&e),
        }
    }
    Ok(())
}

fn handle_summary(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.summary()?;
    print_totals(&result.totals);
    Ok(())
}

fn handle_merge(ctx: &AppContext, output: PathBuf) -> Result<()> {
    let result = ctx.api.merge(&output)?;
    print_result(&result);
    Ok(())
}

fn handle_export(ctx: &AppContext, files: Vec<PathBuf>, out_dir: PathBuf) -> Result<()> {
    for file in files {
        let result = ctx.api.export(&file, &out_dir)?;
        print_result(&result);
    }
    Ok(())
}
