mod logging;
mod replay;
mod trace;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use logging::Logger;
use scrollwatch::{ScrollIntentEngine, Verdict, VerdictRecord};

#[derive(Debug, Parser)]
#[command(name = "scroll_replay")]
#[command(about = "Replay recorded scroll traces through the intent engine")]
struct Cli {
    /// Trace CSV with start/update/end lines.
    trace: PathBuf,
    /// File with one expected verdict label per line.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Echo engine logs to stderr.
    #[arg(long)]
    verbose: bool,
    /// Append engine logs as JSON lines to this file.
    #[arg(long = "log-json")]
    log_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    Logger::new(cli.verbose, cli.log_json.clone())?.install()?;

    let lines = trace::parse_trace(&cli.trace)?;
    let mut engine = ScrollIntentEngine::default();
    let verdicts = replay::replay(&mut engine, &lines);

    println!("verdict,ms,surface,label,source,reason,sum_dy,abs_sum_dy,duration_ms,pos_votes,neg_votes,implicit,lock");
    for record in &verdicts {
        println!("{}", verdict_row(record));
    }

    if let Some(expect_path) = cli.expect {
        let expected = trace::parse_expected_verdicts(&expect_path)?;
        let actual: Vec<Verdict> = verdicts.iter().map(|record| record.verdict).collect();
        if actual != expected {
            eprintln!("expected verdicts: {}", labels(&expected));
            eprintln!("actual verdicts:   {}", labels(&actual));
            bail!("verdict sequence mismatch");
        }
    }

    log::logger().flush();
    Ok(())
}

fn verdict_row(record: &VerdictRecord) -> String {
    format!(
        "verdict,{},{},{},{},{},{},{},{},{},{},{},{}",
        record.finalized_at_ms,
        record.surface,
        record.verdict.label(),
        record.source.label(),
        record.reason.label(),
        record.sum_dy,
        record.abs_sum_dy,
        record.duration_ms,
        record.pos_votes,
        record.neg_votes,
        u8::from(record.implicit),
        record.locked_sign
    )
}

fn labels(verdicts: &[Verdict]) -> String {
    verdicts
        .iter()
        .map(|verdict| verdict.label())
        .collect::<Vec<_>>()
        .join(",")
}
