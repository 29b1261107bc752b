//! # Evidence fingerprints
//!
//! `sct hash FILE...` prints one `<sha256>  <path>` line per file, in the
//! `sha256sum` layout. `sct verify FILE --expected HEX` exits 1 on mismatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use sct_crypto::HashEngine;

use crate::read_input;

/// Arguments for `sct hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Files to fingerprint (`-` for stdin).
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for `sct verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File to check (`-` for stdin).
    pub file: PathBuf,

    /// Expected SHA-256, 64 hex characters.
    #[arg(long)]
    pub expected: String,
}

pub fn run_hash(args: &HashArgs) -> Result<u8> {
    for path in &args.files {
        let bytes = read_input(path)?;
        println!("{}  {}", HashEngine::fingerprint_hex(&bytes), path.display());
    }
    Ok(0)
}

pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let bytes = read_input(&args.file)?;
    if HashEngine::verify(&bytes, &args.expected) {
        println!("OK  {}", args.file.display());
        Ok(0)
    } else {
        println!(
            "MISMATCH  {}  computed {}",
            args.file.display(),
            HashEngine::fingerprint_hex(&bytes)
        );
        Ok(1)
    }
}
