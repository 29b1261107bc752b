//! # sct-cli: Supply-Chain Transparency Toolchain
//!
//! Provides the `sct` command-line interface over the workspace crates.
//! Every subcommand works on local files: no server, no database.
//!
//! ## Subcommands
//!
//! - `sct hash` / `sct verify`: SHA-256 fingerprints of evidence files.
//! - `sct token`: mint supplier access tokens.
//! - `sct tree` / `sct score`: supplier forest and transparency score from
//!   a product snapshot JSON.
//! - `sct gstin` / `sct msme`: supplier registration checks.
//! - `sct reverify`: re-hash every document of a snapshot against a
//!   filesystem blob store.
//!
//! ```bash
//! sct hash certificate.pdf
//! sct verify certificate.pdf --expected e3b0c442...
//! sct tree snapshot.json --audit
//! sct reverify --store ./blobs snapshot.json --output checked.json
//! ```
//!
//! Handlers return a process exit code: `0` success, `1` a negative
//! finding (mismatch, invalid identifier, hierarchy violation).

pub mod chain;
pub mod digest;
pub mod integrity;
pub mod registry;
pub mod token;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use sct_disclosure::DisclosureConfig;

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

/// Parse a JSON document from a file or stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_input(path)?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load configuration from a YAML file, or from `SCT_*` environment
/// variables when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<DisclosureConfig> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read config {}", p.display()))?;
            DisclosureConfig::from_yaml_str(&text)
                .with_context(|| format!("invalid config {}", p.display()))
        }
        None => DisclosureConfig::from_env().context("invalid SCT_* environment configuration"),
    }
}
