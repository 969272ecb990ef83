use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::filter::Directive;

/// Wordfield: text visualized as fields of cubes, rendered in the terminal.
#[derive(Parser, Debug)]
#[command(name = "wordfield", version, about)]
pub struct Args {
    /// Sketch to run (see --list).
    #[arg(default_value = "term-field")]
    pub sketch: String,

    /// Config file path.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source text file for the term field.
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// Seed for instance placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level override (debug, info, warn, error) or a full directive
    /// such as `wordfield=debug`.
    #[arg(long, value_parser = parse_log_level)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// List available sketches and exit.
    #[arg(long)]
    pub list: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

fn parse_log_level(value: &str) -> Result<String, String> {
    value
        .parse::<Directive>()
        .map(|_| value.to_string())
        .map_err(|e| format!("invalid log level `{value}`: {e}"))
}
