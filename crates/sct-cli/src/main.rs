//! # sct CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to the subcommand handlers in `sct_cli`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sct_cli::chain::{run_score, run_tree, ScoreArgs, TreeArgs};
use sct_cli::digest::{run_hash, run_verify, HashArgs, VerifyArgs};
use sct_cli::integrity::{run_reverify, ReverifyArgs};
use sct_cli::registry::{run_gstin, run_msme, GstinArgs, MsmeArgs};
use sct_cli::token::{run_token, TokenArgs};

/// Supply-chain transparency toolchain.
///
/// Fingerprints evidence documents, mints supplier tokens, rebuilds
/// supply-chain trees and transparency scores from product snapshots, and
/// checks supplier registrations.
#[derive(Parser, Debug)]
#[command(name = "sct", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// YAML configuration file. Defaults to `SCT_*` environment variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the SHA-256 fingerprint of files.
    Hash(HashArgs),

    /// Check a file against an expected SHA-256 fingerprint.
    Verify(VerifyArgs),

    /// Mint supplier access tokens.
    Token(TokenArgs),

    /// Build the supplier forest from a snapshot.
    Tree(TreeArgs),

    /// Compute the transparency score of a snapshot.
    Score(ScoreArgs),

    /// Validate (and optionally look up) a GSTIN.
    Gstin(GstinArgs),

    /// Validate a Udyam number and categorize an enterprise.
    Msme(MsmeArgs),

    /// Re-verify a snapshot's documents against a filesystem blob store.
    Reverify(ReverifyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = match cli.command {
        Commands::Hash(args) => run_hash(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Token(args) => run_token(&args),
        Commands::Tree(args) => run_tree(&args),
        Commands::Score(args) => run_score(&args),
        Commands::Msme(args) => run_msme(&args),
        Commands::Gstin(args) => sct_cli::load_config(cli.config.as_deref())
            .and_then(|config| run_gstin(&args, &config.compliance)),
        Commands::Reverify(args) => sct_cli::load_config(cli.config.as_deref())
            .and_then(|config| run_reverify(&args, &config.integrity)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sct", "hash", "a.pdf", "-vv", "--log-json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::Hash(ref a) if a.files.len() == 1));
    }

    #[test]
    fn verify_requires_expected() {
        assert!(Cli::try_parse_from(["sct", "verify", "a.pdf"]).is_err());
        let cli = Cli::try_parse_from(["sct", "verify", "a.pdf", "--expected", "00"]).unwrap();
        assert!(matches!(cli.command, Commands::Verify(_)));
    }

    #[test]
    fn msme_investment_requires_turnover() {
        assert!(Cli::try_parse_from(["sct", "msme", "--investment", "10"]).is_err());
        assert!(Cli::try_parse_from(["sct", "msme", "--investment", "10", "--turnover", "20"]).is_ok());
    }

    #[test]
    fn reverify_parses_store_and_output() {
        let cli = Cli::try_parse_from([
            "sct", "reverify", "snap.json", "--store", "/tmp/blobs", "--output", "out.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Reverify(args) => {
                assert_eq!(args.store, PathBuf::from("/tmp/blobs"));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
