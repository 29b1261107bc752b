//! # Blob Store Adapter
//!
//! Evidence bytes live in a blob store keyed by an opaque relative path.
//! The disclosure services never see where bytes physically live; they go
//! through the [`BlobStore`] trait.
//!
//! Two implementations ship here:
//!
//! - [`InMemoryBlobStore`] for tests and single-process use.
//! - [`FsBlobStore`], rooted at a local directory.
//!
//! ## Timeouts
//!
//! Every fetch carries a deadline. An elapsed deadline surfaces as
//! [`BlobError::Timeout`], which maps to `StorageUnavailable` and is safe
//! to retry. It never turns into a `verified = false` verdict.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use thiserror::Error;

use sct_core::SctError;

/// Errors from blob store operations.
#[derive(Error, Debug)]
pub enum BlobError {
    /// No blob at this path.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// The fetch did not complete within its deadline.
    #[error("blob fetch for {path} timed out after {elapsed_ms} ms")]
    Timeout {
        /// Path being fetched.
        path: String,
        /// Time spent before giving up.
        elapsed_ms: u128,
    },

    /// The backing store could not be reached.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure.
    #[error("blob store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The path is empty, absolute, or escapes the store root.
    #[error("invalid blob path: {0:?}")]
    InvalidPath(String),
}

impl From<BlobError> for SctError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::InvalidPath(_) => SctError::InvalidInput(e.to_string()),
            other => SctError::StorageUnavailable(other.to_string()),
        }
    }
}

/// Storage for uploaded evidence bytes.
///
/// Implementations must be object-safe and shareable across threads; the
/// services hold an `Arc<dyn BlobStore>`.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any previous content.
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), BlobError>;

    /// Fetch the bytes at `path`, failing with [`BlobError::Timeout`] when
    /// `timeout` elapses first.
    fn get(&self, path: &str, timeout: Duration) -> Result<Vec<u8>, BlobError>;

    /// Name of the backing store, for logs.
    fn store_name(&self) -> &str;
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Drop the blob at `path`, returning whether one existed.
    pub fn remove(&self, path: &str) -> bool {
        self.blobs.write().remove(path).is_some()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), BlobError> {
        check_relative(path)?;
        self.blobs.write().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, path: &str, _timeout: Duration) -> Result<Vec<u8>, BlobError> {
        check_relative(path)?;
        self.blobs
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(path.to_string()))
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, BlobError> {
        Ok(self.root.join(check_relative(path)?))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), BlobError> {
        let full = self.resolve(path)?;
        if let Some(dir) = full.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&full, bytes)?;
        tracing::debug!(path, bytes = bytes.len(), "blob written");
        Ok(())
    }

    fn get(&self, path: &str, timeout: Duration) -> Result<Vec<u8>, BlobError> {
        let full = self.resolve(path)?;
        let started = Instant::now();
        let (tx, rx) = mpsc::sync_channel(1);
        // A stalled read (hung mount, FIFO with no writer) keeps the worker
        // parked; the caller still returns at the deadline.
        std::thread::Builder::new()
            .name("sct-blob-read".into())
            .spawn(move || {
                let _ = tx.send(std::fs::read(&full));
            })?;
        match rx.recv_timeout(timeout) {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(path.to_string()))
            }
            Ok(Err(e)) => Err(BlobError::Io(e)),
            Err(RecvTimeoutError::Timeout) => {
                let elapsed = started.elapsed();
                tracing::warn!(path, elapsed_ms = elapsed.as_millis() as u64, "blob fetch timed out");
                Err(BlobError::Timeout {
                    path: path.to_string(),
                    elapsed_ms: elapsed.as_millis(),
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(BlobError::Unavailable(format!(
                "reader for {path} exited without a result"
            ))),
        }
    }

    fn store_name(&self) -> &str {
        "filesystem"
    }
}

/// Accept only non-empty relative paths made of normal components.
fn check_relative(path: &str) -> Result<&Path, BlobError> {
    let p = Path::new(path);
    let ok = !path.is_empty()
        && p.components().all(|c| matches!(c, Component::Normal(_)));
    if ok {
        Ok(p)
    } else {
        Err(BlobError::InvalidPath(path.to_string()))
    }
}
