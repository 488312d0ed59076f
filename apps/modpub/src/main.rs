use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use modpub_publish::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "modpub")]
#[command(about = "Republish ES module sources with remapped import specifiers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Publish every target into its destination tree
    Build(Config),
    /// Report published files that are missing or out of date
    Check(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Build(cfg) => {
            let plan = cfg.load_plan()?;
            info!("Running publish with {} job(s)", plan.jobs.len());

            let report = modpub_publish::run_publish(&plan)?;
            modpub_publish::print_publish_summary(&mut stdout, &report)?;

            writeln!(
                stdout,
                "{} Finished in {}ms.",
                "●".bright_blue(),
                start.elapsed().as_millis().to_string().cyan()
            )?;
            stdout.flush()?;
            Ok(())
        }
        Commands::Check(cfg) => {
            let plan = cfg.load_plan()?;
            info!("Running staleness check with {} job(s)", plan.jobs.len());

            let result = modpub_publish::run_check(&plan)?;
            modpub_publish::print_check_result(&mut stdout, &result)?;

            writeln!(
                stdout,
                "\n{} Finished in {}ms on {} files.",
                "●".bright_blue(),
                start.elapsed().as_millis().to_string().cyan(),
                result.files_checked.to_string().cyan()
            )?;
            stdout.flush()?;

            if !result.stale.is_empty() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
