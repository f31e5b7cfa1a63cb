//! Stat Oracle CLI
//!
//! Prints reference log-densities and gradients for the built-in fixtures or
//! for cases read from a JSON file.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stat_oracle::{evaluate_batch, fixtures, render, DistributionKind, Mode, OracleCase};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stat-oracle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a built-in reference fixture
    Eval {
        /// Distribution name (bernoulli, cauchy, normal, uniform, wishart)
        distribution: DistributionKind,

        /// Shape variant code, one letter per argument (e.g. vsm), or a named
        /// fixture such as bernoulli's ss_x_one
        variant: String,

        /// forward for the log-density, backward for the gradient
        #[arg(long, default_value = "backward")]
        mode: Mode,

        /// Digits after the decimal point (defaults to the distribution's own)
        #[arg(long)]
        precision: Option<usize>,
    },

    /// Evaluate every case in a JSON file
    Run {
        /// File holding a JSON array of cases
        cases: PathBuf,

        #[arg(long, default_value = "backward")]
        mode: Mode,
    },

    /// List distributions and their fixtures
    List,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only values
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            distribution,
            variant,
            mode,
            precision,
        } => {
            let case = fixtures::case(distribution, &variant)?;
            let values = case.evaluate(mode)?;
            print!(
                "{}",
                render(&values, precision.unwrap_or(distribution.precision()))
            );
        }
        Commands::Run { cases, mode } => {
            let text = std::fs::read_to_string(&cases)
                .with_context(|| format!("reading {}", cases.display()))?;
            let parsed: Vec<OracleCase> = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", cases.display()))?;
            tracing::info!(path = %cases.display(), count = parsed.len(), %mode, "running cases");

            let results = evaluate_batch(&parsed, mode);
            let mut failed = 0;
            for (i, (case, result)) in parsed.iter().zip(results).enumerate() {
                if i > 0 {
                    println!();
                }
                match result {
                    Ok(values) => print!("{}", render(&values, case.kind().precision())),
                    Err(e) => {
                        failed += 1;
                        tracing::error!(index = i, distribution = %case.kind(), error = %e, "case failed");
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} cases failed", failed, parsed.len());
            }
        }
        Commands::List => {
            for kind in DistributionKind::ALL {
                println!(
                    "{:<10} precision {:>2}  {}",
                    kind.name(),
                    kind.precision(),
                    fixtures::fixture_names(kind).join(" ")
                );
            }
        }
    }

    Ok(())
}
