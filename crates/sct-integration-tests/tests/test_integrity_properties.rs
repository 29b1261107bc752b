//! # Integrity Properties
//!
//! Property tests across `sct-crypto` and the integrity service: hash
//! determinism, verify round-trip, single-byte tamper detection through the
//! blob store, and score bounds over arbitrary snapshots.

use std::sync::Arc;

use proptest::prelude::*;

use sct_core::{AccessToken, ProductId, Supplier, SupplierStatus, SurveyId, SurveyResponse};
use sct_crypto::HashEngine;
use sct_disclosure::{
    BlobStore, DisclosureRepository, DocumentIntegrityService, InMemoryBlobStore,
    InMemoryRepository, IntegrityConfig, Upload,
};
use sct_score::{ScoreInputs, TransparencyScorer};

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[test]
fn empty_input_vector() {
    assert_eq!(HashEngine::fingerprint_hex(b""), EMPTY_SHA256);
    assert!(HashEngine::verify(b"", EMPTY_SHA256));
    assert!(!HashEngine::verify(b"", ""));
}

fn service() -> (Arc<InMemoryBlobStore>, DocumentIntegrityService, SurveyResponse) {
    let blobs = Arc::new(InMemoryBlobStore::new());
    let repo = Arc::new(InMemoryRepository::new());
    let response = SurveyResponse::pending(
        SurveyId::new(),
        "s@example.test",
        None,
        AccessToken::new("0".repeat(64)).unwrap(),
    );
    repo.insert_response(response.clone()).unwrap();
    let svc = DocumentIntegrityService::new(IntegrityConfig::default(), blobs.clone(), repo);
    (blobs, svc, response)
}

proptest! {
    #[test]
    fn fingerprint_is_deterministic_and_verifies(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let a = HashEngine::fingerprint_hex(&data);
        prop_assert_eq!(&a, &HashEngine::fingerprint_hex(&data));
        prop_assert_eq!(a.len(), 64);
        prop_assert!(HashEngine::verify(&data, &a));
        prop_assert!(HashEngine::verify(&data, &a.to_uppercase()));
    }

    #[test]
    fn any_single_byte_tamper_is_detected(
        data in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let (blobs, svc, response) = service();
        let doc = svc
            .ingest(response.id, &Upload::new(data.clone(), "e.pdf", "application/pdf"))
            .unwrap();
        prop_assert!(svc.reverify(&doc).unwrap());

        let mut tampered = data;
        let i = index.index(tampered.len());
        tampered[i] ^= flip;
        blobs.put(doc.storage_path(), &tampered).unwrap();
        prop_assert!(!svc.reverify(&doc).unwrap());
    }

    #[test]
    fn score_stays_in_bounds(
        statuses in prop::collection::vec(0u8..3, 0..60),
        total_documents in 0usize..40,
        verified_share in 0usize..=40,
    ) {
        let product = ProductId::new();
        let suppliers: Vec<Supplier> = statuses
            .iter()
            .map(|s| {
                let mut sup = Supplier::new(product, "S", "s@example.test", 1, None);
                sup.status = match s {
                    0 => SupplierStatus::Pending,
                    1 => SupplierStatus::Responded,
                    _ => SupplierStatus::Verified,
                };
                sup
            })
            .collect();
        let responded = suppliers.iter().filter(|s| s.status.has_responded()).count();
        let inputs = ScoreInputs {
            total_suppliers: suppliers.len(),
            responded_suppliers: responded,
            total_documents,
            verified_documents: verified_share.min(total_documents),
        };
        let score = TransparencyScorer::score_inputs(&inputs);
        prop_assert!(score.transparency_score <= 100);
        prop_assert!(score.supplier_completion_rate <= 100);
        if suppliers.is_empty() {
            prop_assert_eq!(score.supplier_completion_rate, 0);
        }
    }
}
