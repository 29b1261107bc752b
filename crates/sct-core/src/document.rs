//! # Evidence Documents
//!
//! A document is an evidence file attached to a survey response. Its
//! `hash_sha256` is computed from the exact uploaded bytes once, at ingest,
//! and never changes afterwards. `verified` records the outcome of the most
//! recent integrity re-check; it starts `false` and is only set by
//! re-hashing the stored bytes.

use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;
use crate::identity::{DocumentId, ResponseId};
use crate::temporal::Timestamp;

/// An evidence document attached to a survey response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The response this document belongs to.
    pub response_id: ResponseId,
    /// Filename as uploaded. Display only; never used as a storage path.
    pub original_filename: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub file_size: u64,
    /// Opaque blob store location.
    storage_path: String,
    /// Fingerprint of the uploaded bytes.
    hash_sha256: ContentDigest,
    /// When the document was captured.
    pub timestamp: Timestamp,
    /// Outcome of the latest integrity re-check.
    pub verified: bool,
    /// Reserved for an external anchoring reference; never populated here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_anchor_tx_id: Option<String>,
}

impl Document {
    /// Record a freshly ingested document. `verified` starts `false`.
    pub fn ingested(
        response_id: ResponseId,
        original_filename: impl Into<String>,
        mime_type: impl Into<String>,
        file_size: u64,
        storage_path: impl Into<String>,
        hash_sha256: ContentDigest,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            response_id,
            original_filename: original_filename.into(),
            mime_type: mime_type.into(),
            file_size,
            storage_path: storage_path.into(),
            hash_sha256,
            timestamp: Timestamp::now(),
            verified: false,
            blockchain_anchor_tx_id: None,
        }
    }

    /// The fingerprint recorded at ingest.
    pub fn hash_sha256(&self) -> &ContentDigest {
        &self.hash_sha256
    }

    /// The blob store location.
    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::ingested(
            ResponseId::new(),
            "certificate.pdf",
            "application/pdf",
            1024,
            "uploads/abc.pdf",
            ContentDigest::from_bytes([7u8; 32]),
        )
    }

    #[test]
    fn ingested_document_starts_unverified() {
        let doc = sample();
        assert!(!doc.verified);
        assert!(doc.blockchain_anchor_tx_id.is_none());
        assert_eq!(doc.storage_path(), "uploads/abc.pdf");
    }

    #[test]
    fn json_carries_hash_as_hex() {
        let doc = sample();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["hashSha256"], serde_json::json!("07".repeat(32)));
        assert_eq!(value["originalFilename"], serde_json::json!("certificate.pdf"));
        assert!(value.get("blockchainAnchorTxId").is_none());
    }

    #[test]
    fn json_roundtrip_preserves_hash() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hash_sha256(), doc.hash_sha256());
        assert_eq!(back, doc);
    }
}
