use std::{
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::{Context, Result};
use celldb::{
    config::Config,
    executor::{ExecuteOutcome, Executor},
};
use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const PROMPT: &str = "db > ";

/// A single-table database stored as a B+ tree in a paged file
#[derive(Parser, Debug)]
#[command(name = "celldb", version)]
struct Args {
    /// Database file, created if it does not exist
    #[arg(value_name = "FILE")]
    db_path: Option<PathBuf>,

    /// Maximum number of pages the file may grow to
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    let mut executor = Executor::open(&config)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;

    if io::stdin().is_terminal() {
        run_interactive(&mut executor, &config)?;
    } else {
        run_piped(&mut executor)?;
    }

    executor.close().context("failed to flush database")?;
    info!("database closed");
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("celldb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(path) = &args.db_path {
        config.db_path = path.clone();
    }
    if let Some(max_pages) = args.max_pages {
        config.max_pages = max_pages;
    }
    config.validate()?;
    Ok(config)
}

/// Runs one line and prints its output. Returns `false` once the session should end.
fn handle_line(executor: &mut Executor, line: &str, out: &mut impl Write) -> Result<bool> {
    match executor.execute_line(line)? {
        ExecuteOutcome::Exit => Ok(false),
        ExecuteOutcome::Output(lines) => {
            for line in lines {
                writeln!(out, "{}", line)?;
            }
            Ok(true)
        }
    }
}

fn run_interactive(executor: &mut Executor, config: &Config) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    if let Some(path) = &config.history_file {
        if let Err(e) = editor.load_history(path) {
            debug!("no history loaded: {}", e);
        }
    }

    let mut stdout = io::stdout();
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                if !handle_line(executor, &line, &mut stdout)? {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &config.history_file {
        if let Err(e) = editor.save_history(path) {
            debug!("failed to save history: {}", e);
        }
    }
    Ok(())
}

/// Line-at-a-time loop for scripted input. The prompt is printed before every
/// read so transcripts look the same as an interactive session.
fn run_piped(executor: &mut Executor) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout().lock();
    let mut line = String::new();

    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("end of input");
            break;
        }
        if !handle_line(executor, &line, &mut stdout)? {
            break;
        }
    }
    stdout.flush()?;
    Ok(())
}
