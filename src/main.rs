mod calendar;
mod cell;
mod cli;
mod commands;
mod config;
mod dates;
mod grid;
mod ics;
mod model;
mod shell;
mod storage;
mod style;

use anyhow::{anyhow, Result};
use calendar::CalendarView;
use chrono::Local;
use clap::Parser;
use cli::{Cli, Command};
use commands::Workspace;
use std::io::{self, IsTerminal};
use style::Painter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose, args.quiet)?;

    let mut ws = Workspace::open(args.file, args.config)?;
    let today = Local::now().date_naive();
    let painter = Painter::new(io::stdout().is_terminal());
    let mut view = CalendarView::new(today, painter);

    match args.command.unwrap_or(Command::Shell) {
        Command::Add { description, due } => commands::add(&mut ws, &description, due.as_deref()),
        Command::List { all } => commands::list(&ws, all),
        Command::Done { id } => commands::complete(&mut ws, id),
        Command::Delete { id } => commands::delete(&mut ws, id),
        Command::Clear => commands::clear(&mut ws),
        Command::Calendar { month } => commands::calendar(&ws, &mut view, month.as_deref()),
        Command::Day { month, day } => commands::day(&ws, &view, month, day),
        Command::Config { action } => commands::configure(&mut ws, action),
        Command::Shell => {
            let mut shell = shell::Shell::new(ws, today, painter);
            shell.run(io::stdin().lock(), &mut io::stdout().lock())
        }
    }
}

/// Logs go to stderr so they never interleave with calendar redraws.
fn init_tracing(verbose: u8, quiet: u8) -> Result<()> {
    let default_level = if quiet >= 1 {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
    Ok(())
}
