//! Price fetching command for taxlot.
//!
//! Fetches latest closing prices for ticker symbols from Yahoo Finance.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use taxlot_quotes::{fetch_batch, normalize_symbols, PriceSource, YahooFinance};

/// Fetch latest closing prices for ticker symbols.
#[derive(Parser, Debug)]
#[command(name = "price", about = "Fetch latest closing prices for ticker symbols")]
pub struct Args {
    /// Ticker symbols to fetch (e.g., AAPL, MSFT).
    #[arg(value_name = "SYMBOL", required = true)]
    symbols: Vec<String>,

    /// Output the batch as JSON.
    #[arg(short, long)]
    json: bool,

    /// Show verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point for the price command.
pub fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Run the price command.
pub fn run(args: &Args) -> Result<()> {
    let symbols = normalize_symbols(&args.symbols.join(","));
    if symbols.is_empty() {
        anyhow::bail!("no valid ticker symbols provided");
    }

    if args.verbose {
        eprintln!("Fetching prices for: {symbols:?}");
    }

    let source = YahooFinance::new();
    tracing::debug!(source = source.name(), count = symbols.len(), "fetching quotes");
    let batch = fetch_batch(&source, &symbols);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.json {
        serde_json::to_writer_pretty(&mut handle, &batch)?;
        writeln!(handle)?;
    } else {
        for symbol in &symbols {
            if let Some(price) = batch.prices.get(symbol) {
                writeln!(handle, "{symbol}: {price}")?;
            }
        }
    }

    for (symbol, message) in &batch.errors {
        eprintln!("; Failed to fetch {symbol}: {message}");
    }

    if batch.is_empty() {
        anyhow::bail!("no prices resolved for {} symbol(s)", symbols.len());
    }

    Ok(())
}
