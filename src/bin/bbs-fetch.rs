use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use bbs_fetch::args::Args;
use bbs_fetch::config::load_config_or_default;
use bbs_fetch::logging::init_logging;
use bbs_fetch::{Client, FetchEngine};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref());

    let config = load_config_or_default(&args.config)?;
    let client = Client::builder(config).start().await?;

    let mut engine = FetchEngine::new(&client, &args.board, &args.thread)
        .with_context(|| format!("cannot fetch {}", args.describe()))?;
    info!("Fetching {} from {}", args.describe(), engine.target());
    let outcome = engine.fetch().await;

    println!("status:   {}", outcome.status);
    println!("size:     {}", outcome.size);
    println!("modified: {}", outcome.modified);
    println!("lines:    {}", engine.num_lines());
    if !args.board.is_empty() {
        println!("title:    {}", engine.board_name().await);
    }
    if let Some(err) = &outcome.error {
        println!("error:    {}", err);
    }

    if args.print {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&outcome.data)
            .context("failed to write payload")?;
        stdout.flush()?;
    }

    client.penalties().flush().await;
    client.board_names().flush().await;
    Ok(())
}
