//! Report command for taxlot.
//!
//! Imports a brokerage activity CSV, runs the capital gains engine, and
//! prints the report as a plain-text table or JSON.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use taxlot_core::{compute_capital_gains, RenderedReport};
use taxlot_importer::{extract_from_file, RobinhoodCsv};

/// Compute capital gains from an activity CSV.
#[derive(Parser, Debug)]
#[command(name = "report", about = "Compute capital gains from an activity CSV")]
pub struct Args {
    /// Brokerage activity CSV export.
    file: PathBuf,

    /// Reference date for the past/current-year split (YYYY-MM-DD,
    /// defaults to today).
    #[arg(short, long)]
    as_of: Option<String>,

    /// Output the full report as JSON.
    #[arg(short, long)]
    json: bool,
}

/// Main entry point for the report command.
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

/// Run the report command.
pub fn run(args: &Args) -> Result<()> {
    let as_of = match &args.as_of {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date: {d}"))?,
        None => Utc::now().date_naive(),
    };

    let imported = extract_from_file(&args.file, &RobinhoodCsv::new())?;
    for warning in &imported.warnings {
        eprintln!("warning: {warning}");
    }
    tracing::debug!(
        records = imported.records.len(),
        warnings = imported.warnings.len(),
        "activity file imported"
    );

    let report = compute_capital_gains(&imported.records, as_of)?;
    let rendered = RenderedReport::from(&report);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut handle, &rendered)?;
        writeln!(handle)?;
    } else {
        print_report(&rendered, &mut handle)?;
    }

    Ok(())
}

fn print_report<W: Write>(report: &RenderedReport, w: &mut W) -> io::Result<()> {
    for (instrument, gains) in &report.gains {
        if gains.is_empty() {
            continue;
        }
        writeln!(w, "{instrument}")?;
        for gain in gains {
            writeln!(
                w,
                "  {} sold {:.5} @ {:.2} (bought {} @ {:.2})  {:+.2} {}",
                gain.sell_date,
                gain.quantity,
                gain.sell_price,
                gain.buy_date,
                gain.buy_price,
                gain.gain_loss,
                gain.gain_type
            )?;
        }
    }

    writeln!(w)?;
    writeln!(w, "past gains:         {:.2}", report.summary.past_gains)?;
    writeln!(
        w,
        "current year gains: {:.2}",
        report.summary.current_year_gains
    )?;

    if !report.unsold_lots.is_empty() {
        writeln!(w)?;
        writeln!(w, "open lots:")?;
        for lot in &report.unsold_lots {
            writeln!(
                w,
                "  {}  {:.5} {} @ {:.2} ({})",
                lot.lot_id, lot.quantity, lot.instrument, lot.cost_basis_per_share,
                lot.purchase_date
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
1/1/2022,1/1/2022,1/3/2022,AAPL,Apple,Buy,10,$10.00,($100.00)
6/1/2022,6/1/2022,6/1/2022,AAPL,Apple split,SPL,10,,
1/10/2023,1/10/2023,1/12/2023,AAPL,Apple,Sell,15,$8.00,$120.00
";

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["report", "activity.csv"]);
        assert_eq!(args.file, PathBuf::from("activity.csv"));
        assert!(args.as_of.is_none());
        assert!(!args.json);
    }

    #[test]
    fn args_parse_with_options() {
        let args = Args::parse_from(["report", "-j", "--as-of", "2023-06-01", "activity.csv"]);
        assert!(args.json);
        assert_eq!(args.as_of.as_deref(), Some("2023-06-01"));
    }

    #[test]
    fn run_produces_a_report_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let args = Args::parse_from([
            "report",
            "--as-of",
            "2023-06-01",
            file.path().to_str().unwrap(),
        ]);
        run(&args).unwrap();
    }

    #[test]
    fn invalid_as_of_date_is_an_error() {
        let args = Args::parse_from(["report", "--as-of", "June 1st", "activity.csv"]);
        assert!(run(&args).is_err());
    }

    #[test]
    fn text_report_lists_gains_and_open_lots() {
        let imported = taxlot_importer::extract_from_string(
            SAMPLE,
            &RobinhoodCsv::new(),
        )
        .unwrap();
        let report = compute_capital_gains(
            &imported.records,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        )
        .unwrap();
        let rendered = RenderedReport::from(&report);

        let mut out = Vec::new();
        print_report(&rendered, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("AAPL"));
        assert!(text.contains("+45.00 long_term"));
        assert!(text.contains("current year gains: 45.00"));
        assert!(text.contains("AAPL-20220101-0"));
    }
}
