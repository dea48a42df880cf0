//! hostsmerge - Blocklist Consolidator for DNS Sinkholes

use chrono::Utc;
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use hostsmerge::cli::Cli;
use hostsmerge::consolidate;
use hostsmerge::error::exit_code_for;

/// Exit code for bad command-line usage
const EXIT_USAGE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    // Setup logging based on verbosity; stdout is reserved for the summary
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = consolidate::run(
        &cli.sources,
        &cli.output,
        cli.merge_options(),
        Utc::now(),
    )
    .await;

    match result {
        Ok(summary) => {
            println!(
                "[OK] {} unique domains written to {} ({} of {} sources retrieved)",
                summary.domains,
                summary.output.display(),
                summary.sources - summary.failed,
                summary.sources
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
