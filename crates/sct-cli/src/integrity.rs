//! # `sct reverify`
//!
//! Re-hashes every document of a snapshot against the bytes in a
//! filesystem blob store and prints the [`IntegritySummary`]. With
//! `--output`, writes the snapshot back with refreshed `verified` flags.
//!
//! Exit code 1 when any document is tampered or unreadable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use sct_core::ProductSnapshot;
use sct_disclosure::{
    DisclosureRepository, DocumentIntegrityService, FsBlobStore, InMemoryRepository,
    IntegrityConfig, IntegritySummary,
};

use crate::{print_json, read_json};

/// Arguments for `sct reverify`.
#[derive(Args, Debug)]
pub struct ReverifyArgs {
    /// Snapshot JSON listing the documents (`-` for stdin).
    pub snapshot: PathBuf,

    /// Root directory of the blob store.
    #[arg(long)]
    pub store: PathBuf,

    /// Write the snapshot with updated `verified` flags here.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run_reverify(args: &ReverifyArgs, config: &IntegrityConfig) -> Result<u8> {
    let snapshot: ProductSnapshot = read_json(&args.snapshot)?;
    let (summary, refreshed) = reverify_snapshot(snapshot, &args.store, config)?;
    print_json(&summary)?;
    if let Some(out) = &args.output {
        let json = serde_json::to_vec_pretty(&refreshed)?;
        std::fs::write(out, json).with_context(|| format!("failed to write {}", out.display()))?;
        tracing::info!(path = %out.display(), "refreshed snapshot written");
    }
    Ok(if summary.is_clean() { 0 } else { 1 })
}

/// Re-verify `snapshot`'s documents against `store`, returning the summary
/// and the snapshot with each document's `verified` flag as persisted.
pub fn reverify_snapshot(
    mut snapshot: ProductSnapshot,
    store: &Path,
    config: &IntegrityConfig,
) -> Result<(IntegritySummary, ProductSnapshot)> {
    let repo = Arc::new(InMemoryRepository::new());
    for response in &snapshot.responses {
        repo.insert_response(response.clone())?;
    }
    for document in &snapshot.documents {
        repo.insert_document(document.clone())
            .with_context(|| format!("document {} has no matching response", document.id))?;
    }

    let service = DocumentIntegrityService::new(
        config.clone(),
        Arc::new(FsBlobStore::new(store)),
        repo.clone(),
    );
    let summary = service.reverify_all(&snapshot.documents);

    for document in &mut snapshot.documents {
        *document = repo.document(&document.id)?;
    }
    Ok((summary, snapshot))
}
