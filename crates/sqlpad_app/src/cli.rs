use std::path::PathBuf;

use clap::Parser;

use crate::platform::logging::LogDestination;

/// sqlpad - type a SQL query, send it to the parse backend, read the reply.
#[derive(Debug, Parser)]
#[command(name = "sqlpad")]
#[command(version)]
#[command(about = "Send SQL queries to a parse backend and show its reply", long_about = None)]
pub struct Cli {
    /// Config file (RON). A missing file means built-in defaults.
    #[arg(long, default_value = "sqlpad.ron")]
    pub config: PathBuf,

    /// Backend origin, e.g. http://localhost:8080
    #[arg(long)]
    pub base_url: Option<String>,

    /// Give up on a parse request after this many milliseconds
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Probe the backend once on start-up (result goes to the log only)
    #[arg(long)]
    pub probe: bool,

    /// Where diagnostics are written
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
