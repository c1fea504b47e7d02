//! Command-line arguments for the `bbs-fetch` binary

use std::path::PathBuf;

use clap::Parser;

/// Fetch one board listing, thread log or the board menu
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path (created with defaults when missing)
    #[arg(short, long, default_value = "bbs-fetch.toml", env = "BBS_FETCH_CONFIG")]
    pub config: PathBuf,

    /// Board name; omit to fetch the board menu
    #[arg(short, long, default_value = "")]
    pub board: String,

    /// Thread id; omit to fetch the board listing
    #[arg(short, long, default_value = "")]
    pub thread: String,

    /// Also write logs to this file
    #[arg(long, env = "BBS_FETCH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the payload to stdout
    #[arg(short, long)]
    pub print: bool,
}

impl Args {
    /// Short description of what is being fetched
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.board.is_empty(), self.thread.is_empty()) {
            (true, _) => "board menu".to_string(),
            (false, true) => format!("board {}", self.board),
            (false, false) => format!("thread {}/{}", self.board, self.thread),
        }
    }
}
