use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tally_cli::commands::{accept, audit, digest, inspect, sign, transfer};
use tally_cli::telemetry;
use tally_ledger::config::CONFIG_FILE;
use tally_ledger::{Config, Digest, DigestAlgorithm};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Two-party ledger with cumulative digest attestation", long_about = None)]
struct Cli {
    /// Party configuration. Defaults to ./config.json when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every line of a ledger with its kind
    Inspect { ledger: PathBuf },
    /// Print the cumulative digest of a ledger
    Digest {
        ledger: PathBuf,

        /// Overrides the configured algorithm
        #[arg(long)]
        algorithm: Option<DigestAlgorithm>,
    },
    /// Check a counterpart's signatures against the counterpart's ledger
    Audit {
        ledger: PathBuf,

        #[arg(long)]
        counterpart: String,

        #[arg(long)]
        counterpart_ledger: PathBuf,

        #[arg(long)]
        algorithm: Option<DigestAlgorithm>,
    },
    /// Record a transfer from the configured party and print the line to hand over
    Transfer {
        ledger: PathBuf,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: i64,

        #[arg(long)]
        unit: String,
    },
    /// Append a counterparty's transaction line verbatim and print our digest
    Accept {
        ledger: PathBuf,

        /// The transaction line exactly as the proposer printed it
        #[arg(long)]
        instance: String,
    },
    /// Record a counterparty's digest as a signature line
    Sign {
        ledger: PathBuf,

        #[arg(long)]
        author: String,

        #[arg(long)]
        digest: Digest,
    },
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Option<Config>> {
    match explicit {
        Some(path) => Ok(Some(Config::load(path)?)),
        None if Path::new(CONFIG_FILE).exists() => Ok(Some(Config::load(CONFIG_FILE)?)),
        None => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let configured_algorithm = config.as_ref().map(|c| c.digest).unwrap_or_default();

    match cli.command {
        Commands::Inspect { ledger } => inspect::run(&ledger),
        Commands::Digest { ledger, algorithm } => {
            digest::run(&ledger, algorithm.unwrap_or(configured_algorithm))
        }
        Commands::Audit {
            ledger,
            counterpart,
            counterpart_ledger,
            algorithm,
        } => audit::run(
            &ledger,
            &counterpart,
            &counterpart_ledger,
            algorithm.unwrap_or(configured_algorithm),
        ),
        Commands::Transfer {
            ledger,
            to,
            amount,
            unit,
        } => {
            let config = config.context("transfer needs a config with a \"Self\" identity")?;
            transfer::run(&ledger, &config, &to, amount, &unit)
        }
        Commands::Accept { ledger, instance } => accept::run(&ledger, config.as_ref(), &instance),
        Commands::Sign {
            ledger,
            author,
            digest,
        } => sign::run(&ledger, config.as_ref(), &author, digest),
    }
}
