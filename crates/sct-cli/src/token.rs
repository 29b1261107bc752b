//! `sct token`: mint supplier access tokens.

use anyhow::Result;
use clap::Args;

use sct_crypto::TokenIssuer;

/// Arguments for `sct token`.
#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Number of tokens to mint.
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,
}

pub fn run_token(args: &TokenArgs) -> Result<u8> {
    for _ in 0..args.count {
        let token = TokenIssuer::issue()?;
        println!("{}", token.as_str());
    }
    Ok(0)
}
