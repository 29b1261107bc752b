//! # Document Integrity
//!
//! Fingerprints evidence at upload and re-checks stored bytes on demand.
//!
//! ## Ingestion
//!
//! The upload is checked against [`IntegrityConfig`], hashed with
//! [`HashEngine`], written to the blob store under a generated path
//! (`{prefix}/{uuid}{.ext}`; the uploaded filename is display-only) and
//! recorded with `verified = false`. Ingestion never certifies itself.
//!
//! ## Re-verification
//!
//! [`DocumentIntegrityService::reverify`] fetches the stored bytes,
//! recomputes the hash, persists the outcome in `verified` and returns it.
//! It is idempotent. Two failure classes stay distinct:
//!
//! - the bytes could not be fetched (timeout, missing blob, I/O): returned
//!   as `StorageUnavailable`, `verified` is left untouched;
//! - the bytes hash differently: `verified = false` is persisted and the
//!   finding is logged. [`DocumentIntegrityService::require_intact`] turns
//!   this into an `IntegrityViolation` error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sct_core::{ContentDigest, Document, DocumentId, ErrorKind, ResponseId, SctError};
use sct_crypto::HashEngine;

use crate::blob::BlobStore;
use crate::config::IntegrityConfig;
use crate::repository::DisclosureRepository;

/// An uploaded file, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// Filename supplied by the uploader.
    pub filename: String,
    /// Declared MIME type.
    pub mime_type: String,
}

impl Upload {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Outcome of a batch re-verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegritySummary {
    /// Stored bytes match the recorded hash.
    pub verified: Vec<DocumentId>,
    /// Stored bytes differ from the recorded hash.
    pub unverified: Vec<DocumentId>,
    /// Bytes could not be fetched; `verified` left unchanged.
    pub unavailable: Vec<DocumentId>,
    /// Any other failure, such as a bad storage path or a repository
    /// error while recording the outcome.
    #[serde(default)]
    pub failed: Vec<DocumentId>,
}

impl IntegritySummary {
    /// Whether every document was fetched and matched.
    pub fn is_clean(&self) -> bool {
        self.unverified.is_empty() && self.unavailable.is_empty() && self.failed.is_empty()
    }

    pub fn checked(&self) -> usize {
        self.verified.len() + self.unverified.len() + self.unavailable.len() + self.failed.len()
    }
}

/// Upload fingerprinting and on-demand re-verification.
#[derive(Clone)]
pub struct DocumentIntegrityService {
    config: IntegrityConfig,
    blobs: Arc<dyn BlobStore>,
    repo: Arc<dyn DisclosureRepository>,
}

impl std::fmt::Debug for DocumentIntegrityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIntegrityService")
            .field("config", &self.config)
            .field("blob_store", &self.blobs.store_name())
            .finish_non_exhaustive()
    }
}

impl DocumentIntegrityService {
    pub fn new(
        config: IntegrityConfig,
        blobs: Arc<dyn BlobStore>,
        repo: Arc<dyn DisclosureRepository>,
    ) -> Self {
        Self {
            config,
            blobs,
            repo,
        }
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// Store `upload` as evidence on `response_id`.
    ///
    /// The caller is responsible for checking that the response still
    /// accepts documents.
    pub fn ingest(&self, response_id: ResponseId, upload: &Upload) -> Result<Document, SctError> {
        self.check_policy(upload)?;
        self.repo.response(&response_id)?;

        let hash = HashEngine::fingerprint(&upload.bytes);
        let path = self.blob_path(&upload.filename);
        self.blobs.put(&path, &upload.bytes)?;

        let doc = Document::ingested(
            response_id,
            upload.filename.trim(),
            upload.mime_type.trim(),
            upload.bytes.len() as u64,
            path,
            hash,
        );
        self.repo.insert_document(doc.clone())?;
        tracing::info!(
            document_id = %doc.id,
            response_id = %response_id,
            bytes = doc.file_size,
            hash = %doc.hash_sha256(),
            "document ingested"
        );
        Ok(doc)
    }

    /// Re-hash the stored bytes of `document` and persist the outcome.
    pub fn reverify(&self, document: &Document) -> Result<bool, SctError> {
        self.recheck(document).map(|(intact, _)| intact)
    }

    /// Like [`reverify`](Self::reverify), but a mismatch is an
    /// `IntegrityViolation` error.
    pub fn require_intact(&self, document: &Document) -> Result<(), SctError> {
        match self.recheck(document)? {
            (true, _) => Ok(()),
            (false, actual) => Err(SctError::IntegrityViolation {
                document_id: document.id.to_string(),
                expected: document.hash_sha256().to_hex(),
                actual: actual.to_hex(),
            }),
        }
    }

    /// Re-verify every document, collecting each outcome.
    pub fn reverify_all(&self, documents: &[Document]) -> IntegritySummary {
        let mut summary = IntegritySummary::default();
        for doc in documents {
            match self.reverify(doc) {
                Ok(true) => summary.verified.push(doc.id),
                Ok(false) => summary.unverified.push(doc.id),
                Err(e) if e.kind() == ErrorKind::StorageUnavailable => {
                    summary.unavailable.push(doc.id)
                }
                Err(e) => {
                    tracing::error!(document_id = %doc.id, error = %e, "re-verification failed");
                    summary.failed.push(doc.id);
                }
            }
        }
        tracing::info!(
            checked = summary.checked(),
            unverified = summary.unverified.len(),
            unavailable = summary.unavailable.len(),
            failed = summary.failed.len(),
            "batch re-verification finished"
        );
        summary
    }

    fn recheck(&self, document: &Document) -> Result<(bool, ContentDigest), SctError> {
        let bytes = self
            .blobs
            .get(document.storage_path(), self.config.fetch_timeout())
            .map_err(|e| {
                tracing::warn!(
                    document_id = %document.id,
                    store = self.blobs.store_name(),
                    error = %e,
                    "could not fetch document bytes"
                );
                SctError::from(e)
            })?;

        let (actual, intact) = HashEngine::fingerprint_and_verify(&bytes, document.hash_sha256());
        self.repo.set_document_verified(&document.id, intact)?;
        if intact {
            tracing::debug!(document_id = %document.id, "document hash verified");
        } else {
            tracing::warn!(
                document_id = %document.id,
                expected = %document.hash_sha256(),
                actual = %actual,
                "document integrity violation"
            );
        }
        Ok((intact, actual))
    }

    fn check_policy(&self, upload: &Upload) -> Result<(), SctError> {
        if upload.filename.trim().is_empty() {
            return Err(SctError::InvalidInput("filename must not be empty".into()));
        }
        if !self.config.allows_mime_type(&upload.mime_type) {
            return Err(SctError::InvalidInput(format!(
                "file type {:?} is not allowed",
                upload.mime_type
            )));
        }
        if upload.bytes.is_empty() {
            return Err(SctError::InvalidInput("uploaded file is empty".into()));
        }
        if upload.bytes.len() as u64 > self.config.max_file_size {
            return Err(SctError::InvalidInput(format!(
                "uploaded file is {} bytes, limit is {}",
                upload.bytes.len(),
                self.config.max_file_size
            )));
        }
        Ok(())
    }

    fn blob_path(&self, filename: &str) -> String {
        format!(
            "{}/{}{}",
            self.config.upload_prefix,
            Uuid::new_v4(),
            extension_suffix(filename)
        )
    }
}

/// `.ext` for a 1–10 character alphanumeric extension, lowercased; empty
/// otherwise.
fn extension_suffix(filename: &str) -> String {
    match filename.trim().rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (1..=10).contains(&ext.len())
                && ext.bytes().all(|b| b.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sct_core::{AccessToken, SurveyId, SurveyResponse};

    use crate::blob::{BlobError, InMemoryBlobStore};
    use crate::repository::InMemoryRepository;

    struct StalledBlobStore;

    impl BlobStore for StalledBlobStore {
        fn put(&self, _path: &str, _bytes: &[u8]) -> Result<(), BlobError> {
            Ok(())
        }
        fn get(&self, path: &str, timeout: Duration) -> Result<Vec<u8>, BlobError> {
            Err(BlobError::Timeout {
                path: path.to_string(),
                elapsed_ms: timeout.as_millis(),
            })
        }
        fn store_name(&self) -> &str {
            "stalled"
        }
    }

    struct Fixture {
        blobs: Arc<InMemoryBlobStore>,
        repo: Arc<InMemoryRepository>,
        service: DocumentIntegrityService,
        response_id: ResponseId,
    }

    fn fixture() -> Fixture {
        let blobs = Arc::new(InMemoryBlobStore::new());
        let repo = Arc::new(InMemoryRepository::new());
        let response = SurveyResponse::pending(
            SurveyId::new(),
            "mill@example.test",
            None,
            AccessToken::new("a".repeat(64)).unwrap(),
        );
        let response_id = response.id;
        repo.insert_response(response).unwrap();
        let service =
            DocumentIntegrityService::new(IntegrityConfig::default(), blobs.clone(), repo.clone());
        Fixture {
            blobs,
            repo,
            service,
            response_id,
        }
    }

    fn pdf(bytes: &[u8]) -> Upload {
        Upload::new(bytes.to_vec(), "GOTS Certificate.PDF", "application/pdf")
    }

    #[test]
    fn ingest_hashes_stores_and_starts_unverified() {
        let f = fixture();
        let doc = f.service.ingest(f.response_id, &pdf(b"certificate")).unwrap();
        assert!(!doc.verified);
        assert_eq!(doc.file_size, 11);
        assert_eq!(doc.original_filename, "GOTS Certificate.PDF");
        assert_eq!(doc.hash_sha256(), &HashEngine::fingerprint(b"certificate"));
        assert!(doc.storage_path().starts_with("uploads/"));
        assert!(doc.storage_path().ends_with(".pdf"));
        assert!(!doc.storage_path().contains("GOTS"));
        assert_eq!(
            f.blobs.get(doc.storage_path(), Duration::from_secs(1)).unwrap(),
            b"certificate"
        );
        assert_eq!(f.repo.document(&doc.id).unwrap(), doc);
    }

    #[test]
    fn same_filename_gets_distinct_paths() {
        let f = fixture();
        let a = f.service.ingest(f.response_id, &pdf(b"one")).unwrap();
        let b = f.service.ingest(f.response_id, &pdf(b"two")).unwrap();
        assert_ne!(a.storage_path(), b.storage_path());
    }

    #[test]
    fn policy_rejections_are_invalid_input() {
        let f = fixture();
        let cases = [
            Upload::new(b"x".to_vec(), "  ", "application/pdf"),
            Upload::new(b"x".to_vec(), "a.html", "text/html"),
            Upload::new(Vec::new(), "a.pdf", "application/pdf"),
            Upload::new(vec![0u8; 10 * 1024 * 1024 + 1], "a.pdf", "application/pdf"),
        ];
        for upload in &cases {
            let err = f.service.ingest(f.response_id, upload).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{err}");
        }
        assert!(f.blobs.is_empty());
    }

    #[test]
    fn ingest_for_unknown_response_writes_no_blob() {
        let f = fixture();
        let err = f.service.ingest(ResponseId::new(), &pdf(b"x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(f.blobs.is_empty());
    }

    #[test]
    fn reverify_marks_intact_document_verified() {
        let f = fixture();
        let doc = f.service.ingest(f.response_id, &pdf(b"certificate")).unwrap();
        assert!(f.service.reverify(&doc).unwrap());
        assert!(f.service.reverify(&doc).unwrap());
        assert!(f.repo.document(&doc.id).unwrap().verified);
    }

    #[test]
    fn tampered_bytes_are_flagged_and_persisted() {
        let f = fixture();
        let doc = f.service.ingest(f.response_id, &pdf(b"certificate")).unwrap();
        assert!(f.service.reverify(&doc).unwrap());

        f.blobs.put(doc.storage_path(), b"certificatE").unwrap();
        assert!(!f.service.reverify(&doc).unwrap());
        assert!(!f.repo.document(&doc.id).unwrap().verified);

        let err = f.service.require_intact(&doc).unwrap_err();
        match err {
            SctError::IntegrityViolation {
                expected, actual, ..
            } => {
                assert_eq!(expected, HashEngine::fingerprint_hex(b"certificate"));
                assert_eq!(actual, HashEngine::fingerprint_hex(b"certificatE"));
            }
            other => panic!("expected IntegrityViolation, got {other}"),
        }
    }

    #[test]
    fn missing_blob_is_storage_unavailable_and_keeps_flag() {
        let f = fixture();
        let doc = f.service.ingest(f.response_id, &pdf(b"certificate")).unwrap();
        f.service.reverify(&doc).unwrap();
        f.blobs.remove(doc.storage_path());
        let err = f.service.reverify(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
        assert!(err.is_retryable());
        assert!(f.repo.document(&doc.id).unwrap().verified);
    }

    #[test]
    fn timeout_is_storage_unavailable_not_a_finding() {
        let f = fixture();
        let doc = f.service.ingest(f.response_id, &pdf(b"certificate")).unwrap();
        let stalled =
            DocumentIntegrityService::new(IntegrityConfig::default(), Arc::new(StalledBlobStore), f.repo.clone());
        let err = stalled.require_intact(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
        assert!(!f.repo.document(&doc.id).unwrap().verified);
    }

    #[test]
    fn reverify_all_partitions_outcomes() {
        let f = fixture();
        let good = f.service.ingest(f.response_id, &pdf(b"good")).unwrap();
        let bad = f.service.ingest(f.response_id, &pdf(b"bad")).unwrap();
        let gone = f.service.ingest(f.response_id, &pdf(b"gone")).unwrap();
        f.blobs.put(bad.storage_path(), b"tampered").unwrap();
        f.blobs.remove(gone.storage_path());

        let summary = f.service.reverify_all(&[good.clone(), bad.clone(), gone.clone()]);
        assert_eq!(summary.verified, vec![good.id]);
        assert_eq!(summary.unverified, vec![bad.id]);
        assert_eq!(summary.unavailable, vec![gone.id]);
        assert_eq!(summary.checked(), 3);
        assert!(!summary.is_clean());
    }

    #[test]
    fn traversal_storage_path_is_invalid_input() {
        let f = fixture();
        let doc = Document::ingested(
            f.response_id,
            "a.pdf",
            "application/pdf",
            1,
            "../escape.pdf",
            HashEngine::fingerprint(b"x"),
        );
        let err = f.service.reverify(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn reverify_all_separates_repository_failures_from_storage() {
        let f = fixture();
        let gone = f.service.ingest(f.response_id, &pdf(b"gone")).unwrap();
        f.blobs.remove(gone.storage_path());
        // Bytes are fetchable and intact, but the repository has no record
        // to update.
        let orphan = Document::ingested(
            f.response_id,
            "orphan.pdf",
            "application/pdf",
            6,
            "uploads/orphan.pdf",
            HashEngine::fingerprint(b"orphan"),
        );
        f.blobs.put(orphan.storage_path(), b"orphan").unwrap();
        let escaping = Document::ingested(
            f.response_id,
            "e.pdf",
            "application/pdf",
            1,
            "/abs/e.pdf",
            HashEngine::fingerprint(b"e"),
        );

        let summary = f
            .service
            .reverify_all(&[gone.clone(), orphan.clone(), escaping.clone()]);
        assert_eq!(summary.unavailable, vec![gone.id]);
        assert_eq!(summary.failed, vec![orphan.id, escaping.id]);
        assert!(summary.verified.is_empty());
        assert_eq!(summary.checked(), 3);
        assert!(!summary.is_clean());
    }

    #[test]
    fn extension_suffix_rules() {
        assert_eq!(extension_suffix("report.PDF"), ".pdf");
        assert_eq!(extension_suffix("sheet.v2.xlsx"), ".xlsx");
        assert_eq!(extension_suffix("noext"), "");
        assert_eq!(extension_suffix(".hidden"), "");
        assert_eq!(extension_suffix("evil.p/df"), "");
        assert_eq!(extension_suffix("long.abcdefghijk"), "");
        assert_eq!(extension_suffix("trailing."), "");
    }
}
