//! # Wire Format Tests
//!
//! The snapshot JSON consumed by the CLI and produced by the repository must
//! keep the camelCase field names and upper-case status spellings. These
//! tests pin that shape with a hand-written fixture.

use sct_core::{ProductSnapshot, ResponseStatus, SupplierStatus};

const FIXTURE: &str = r#"{
  "product": {
    "id": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0001",
    "name": "Organic Cotton Shirt",
    "description": "Combed cotton, size M",
    "companyName": "Acme Textiles"
  },
  "suppliers": [
    {
      "id": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0101",
      "productId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0001",
      "name": "Spinning Mill",
      "email": "mill@example.test",
      "tier": 1,
      "status": "RESPONDED",
      "responseDate": "2026-03-01T09:30:00Z"
    },
    {
      "id": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0102",
      "productId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0001",
      "name": "Cotton Farm",
      "email": "farm@example.test",
      "tier": 2,
      "parentSupplierId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0101",
      "status": "PENDING"
    }
  ],
  "responses": [
    {
      "id": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0201",
      "surveyId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0301",
      "supplierEmail": "mill@example.test",
      "supplierId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0101",
      "token": "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef",
      "status": "SUBMITTED",
      "answers": { "origin": "Gujarat" },
      "submittedAt": "2026-03-01T09:30:00Z",
      "createdAt": "2026-02-20T08:00:00Z"
    }
  ],
  "documents": [
    {
      "id": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0401",
      "responseId": "5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0201",
      "originalFilename": "gots.pdf",
      "mimeType": "application/pdf",
      "fileSize": 2048,
      "storagePath": "uploads/5b0b7f4e-6a1a-4f51-9d0c-2a8f6f6f0999.pdf",
      "hashSha256": "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
      "timestamp": "2026-03-01T09:31:00Z",
      "verified": true
    }
  ]
}"#;

#[test]
fn fixture_parses() {
    let snap: ProductSnapshot = serde_json::from_str(FIXTURE).expect("fixture should parse");
    assert_eq!(snap.suppliers.len(), 2);
    assert_eq!(snap.suppliers[0].status, SupplierStatus::Responded);
    assert_eq!(snap.suppliers[1].status, SupplierStatus::Pending);
    assert_eq!(
        snap.suppliers[1].parent_supplier_id,
        Some(snap.suppliers[0].id)
    );
    assert_eq!(snap.responses[0].status, ResponseStatus::Submitted);
    assert_eq!(snap.responded_suppliers(), 1);
    assert_eq!(snap.supplier_documents().count(), 1);
}

#[test]
fn hash_is_normalized_to_lowercase() {
    let snap: ProductSnapshot = serde_json::from_str(FIXTURE).expect("fixture should parse");
    let out = serde_json::to_value(&snap).expect("serialize");
    assert_eq!(
        out["documents"][0]["hashSha256"],
        serde_json::json!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
    );
}

#[test]
fn lower_case_status_is_rejected() {
    let bad = FIXTURE.replace("\"RESPONDED\"", "\"responded\"");
    assert!(serde_json::from_str::<ProductSnapshot>(&bad).is_err());
}

#[test]
fn malformed_token_is_rejected() {
    let bad = FIXTURE.replace(
        "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef",
        "not-a-token",
    );
    assert!(serde_json::from_str::<ProductSnapshot>(&bad).is_err());
}

#[test]
fn offset_timestamps_are_accepted_as_utc() {
    // chrono's serde impl accepts any RFC 3339 offset and converts to UTC.
    let shifted = FIXTURE.replace("2026-03-01T09:31:00Z", "2026-03-01T15:01:00+05:30");
    let snap: ProductSnapshot = serde_json::from_str(&shifted).expect("fixture should parse");
    assert_eq!(
        snap.documents[0].timestamp.to_iso8601(),
        "2026-03-01T09:31:00Z"
    );
}
