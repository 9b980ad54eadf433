use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pocketcalc::calculator::{
    can_append, evaluate_expression, format_for_display, format_with_commas,
    is_complete_expression,
};
use pocketcalc::config::Config;
use pocketcalc::history::{History, JsonFileStore, format_timestamp, now_millis, truncate_text};
use pocketcalc::session::{CalcState, Key, keys_from_input};

#[derive(Parser)]
#[command(name = "pocketcalc", version, about = "A keypad calculator")]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an expression and print the result.
    Eval {
        /// The expression; several arguments are joined with spaces.
        #[arg(required = true)]
        expression: Vec<String>,

        /// Print the live-preview rendering instead of the settled result.
        #[arg(long)]
        preview: bool,

        /// Do not record the calculation in history.
        #[arg(long)]
        no_history: bool,
    },
    /// Type keys line by line; `=` settles, `C` clears, `<` deletes.
    Repl,
    /// Show or clear calculation history.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Check whether a key may be appended to an expression.
    Check {
        expression: String,
        next: String,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List recent calculations.
    List {
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete all history.
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Eval {
            expression,
            preview,
            no_history,
        } => run_eval(&config, &expression.join(" "), preview, no_history),
        Command::Repl => run_repl(&config),
        Command::History { action } => {
            match action.unwrap_or(HistoryAction::List { limit: 20 }) {
                HistoryAction::List { limit } => list_history(&config, limit),
                HistoryAction::Clear => {
                    let Some(mut history) = open_history(&config) else {
                        anyhow::bail!("No history location available");
                    };
                    history.clear()?;
                    println!("History cleared");
                    Ok(())
                }
            }
        }
        Command::Check { expression, next } => {
            let expression = normalize_operators(&config, &expression);
            let key: Key = normalize_operators(&config, &next).parse()?;
            let accepted = can_append(&expression, &key.to_string());
            println!("{}", if accepted { "yes" } else { "no" });
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_eval(config: &Config, input: &str, preview: bool, no_history: bool) -> Result<()> {
    let expression = normalize_operators(config, input);
    let result = evaluate_expression(&expression);

    if let Some(error) = result.error() {
        println!("{}", result.display());
        anyhow::bail!("{}", error);
    }

    let text = if preview {
        format_for_display(result.display())
    } else {
        result.display().to_string()
    };
    println!("{}", group(config, &text));

    let worth_recording = result.display() != "0" && is_complete_expression(result.expression());
    if !no_history
        && worth_recording
        && let Some(mut history) = open_history(config)
    {
        history.record(result.expression(), result.display());
    }

    Ok(())
}

fn run_repl(config: &Config) -> Result<()> {
    let mut history = open_history(config);
    let mut state = CalcState::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    tracing::info!(mode = ?config.input_mode, "starting repl");

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        for key in keys_from_input(&line, config.ascii_operators) {
            state = state.apply(key, config.input_mode);

            if key == Key::Equals
                && let (Some(history), Some((expression, result))) =
                    (history.as_mut(), state.history_record())
            {
                history.record(expression, result);
            }
        }

        let shown = match state.error() {
            Some(error) => format!("{} ({})", state.preview(), error),
            None => group(config, &state.preview()),
        };
        writeln!(stdout, "{}  = {}", state.expression(), shown)?;
        stdout.flush()?;
    }

    Ok(())
}

fn list_history(config: &Config, limit: usize) -> Result<()> {
    let Some(history) = open_history(config) else {
        anyhow::bail!("No history location available; set history_path in the config");
    };

    if history.is_empty() {
        println!("No calculations yet");
        return Ok(());
    }

    let now = now_millis();
    for entry in history.entries().iter().take(limit) {
        println!(
            "{:<30}  = {:<20}  {}",
            truncate_text(&entry.expression, 30),
            group(config, &entry.result),
            format_timestamp(entry.timestamp, now)
        );
    }

    Ok(())
}

fn open_history(config: &Config) -> Option<History<JsonFileStore>> {
    let Some(path) = config.history_path() else {
        tracing::warn!("No data directory found; history is disabled");
        return None;
    };
    Some(History::open(JsonFileStore::new(path), config.history_limit))
}

/// Map ASCII `*` and `/` onto the keypad operators when enabled.
fn normalize_operators(config: &Config, text: &str) -> String {
    if !config.ascii_operators {
        return text.to_string();
    }
    text.replace('*', "×").replace('/', "÷")
}

fn group(config: &Config, text: &str) -> String {
    if config.group_digits {
        format_with_commas(text)
    } else {
        text.to_string()
    }
}
