//! agora CLI tool
//!
//! Ranks feeds and analyzes votes from JSON files or stdin.
//!
//! Usage:
//!   agora rank <strategy> [FILE]
//!   agora rank-scored <strategy> [FILE]
//!   agora consensus [FILE]
//!   agora backend

use std::io::Read;
use std::path::PathBuf;

use agora_engine::{Engine, EngineConfig, ScorableItem, VoteEvent};
use chrono::Utc;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    config: Option<PathBuf>,
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Rank { strategy: String, input: Option<PathBuf> },
    RankScored { strategy: String, input: Option<PathBuf> },
    Consensus { input: Option<PathBuf> },
    Backend,
    Help,
}

fn print_usage() {
    eprintln!("agora - Rank feeds and analyze deliberations");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  agora [--config <path>] rank <strategy> [FILE]         Print ranked item ids");
    eprintln!("  agora [--config <path>] rank-scored <strategy> [FILE]  Print ids with scores");
    eprintln!("  agora [--config <path>] consensus [FILE]               Analyze vote events");
    eprintln!("  agora [--config <path>] backend                        Print the selected backend");
    eprintln!();
    eprintln!("Strategies: newest, trending, wilson, controversial");
    eprintln!("Input is read from FILE, or stdin when FILE is omitted or '-'.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  AGORA_*           Engine settings, applied over --config");
    eprintln!("  RUST_LOG          Log filter (default: agora=info)");
    eprintln!("  AGORA_LOG_FORMAT  'json' for JSON log lines");
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config = None;
    let mut positional = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--config requires a path argument".to_string())?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => positional.push("help".to_string()),
            _ => positional.push(arg.clone()),
        }
    }

    let input = |i: usize| {
        positional
            .get(i)
            .filter(|p| p.as_str() != "-")
            .map(PathBuf::from)
    };

    let command = match positional.first().map(String::as_str) {
        None | Some("help") => Command::Help,
        Some("rank") => Command::Rank {
            strategy: positional
                .get(1)
                .cloned()
                .ok_or_else(|| "rank requires a strategy argument".to_string())?,
            input: input(2),
        },
        Some("rank-scored") => Command::RankScored {
            strategy: positional
                .get(1)
                .cloned()
                .ok_or_else(|| "rank-scored requires a strategy argument".to_string())?,
            input: input(2),
        },
        Some("consensus") => Command::Consensus { input: input(1) },
        Some("backend") => Command::Backend,
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };

    Ok(Invocation { config, command })
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Execute a data command against `input`, returning the JSON to print.
fn execute(engine: &Engine, command: &Command, input: &str) -> agora_engine::Result<String> {
    let output = match command {
        Command::Rank { strategy, .. } => {
            let items: Vec<ScorableItem> = serde_json::from_str(input)?;
            serde_json::to_string_pretty(&engine.rank(&items, strategy)?)?
        }
        Command::RankScored { strategy, .. } => {
            let items: Vec<ScorableItem> = serde_json::from_str(input)?;
            let ranked = engine.rank_scored(&items, strategy, Utc::now())?;
            serde_json::to_string_pretty(&ranked)?
        }
        Command::Consensus { .. } => {
            let votes: Vec<VoteEvent> = serde_json::from_str(input)?;
            serde_json::to_string_pretty(&engine.analyze_consensus(&votes)?)?
        }
        Command::Backend => engine.backend_kind().to_string(),
        Command::Help => String::new(),
    };
    Ok(output)
}

fn run(invocation: Invocation) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::load(invocation.config.as_deref())?;
    let engine = Engine::new(config);

    let input = match &invocation.command {
        Command::Rank { input, .. }
        | Command::RankScored { input, .. }
        | Command::Consensus { input } => read_input(input.as_ref())?,
        Command::Backend | Command::Help => String::new(),
    };

    println!("{}", execute(&engine, &invocation.command, &input)?);
    Ok(())
}

fn main() {
    agora_logging::init("agora=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if invocation.command == Command::Help {
        print_usage();
        return;
    }

    if let Err(e) = run(invocation) {
        tracing::debug!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
