//! # Supplier Records
//!
//! A supplier belongs to exactly one product's supply chain. Its position in
//! the chain is expressed by `tier` (1 = direct supplier to the manufacturer)
//! and an optional weak reference to a parent supplier. The parent never
//! owns its children; the tree is reconstructed on demand by `sct-graph`.

use serde::{Deserialize, Serialize};

use crate::identity::{ProductId, SupplierId};
use crate::temporal::Timestamp;

/// Disclosure progress of a supplier.
///
/// Wire spelling is upper case (`PENDING`, `RESPONDED`, `VERIFIED`) and is
/// the only accepted spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    /// Invited, nothing submitted yet.
    Pending,
    /// At least one survey response has been submitted.
    Responded,
    /// An operator confirmed the supplier's disclosure.
    Verified,
}

impl SupplierStatus {
    /// Whether the supplier counts towards response coverage.
    pub fn has_responded(&self) -> bool {
        matches!(self, Self::Responded | Self::Verified)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Responded => "RESPONDED",
            Self::Verified => "VERIFIED",
        }
    }
}

impl std::fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplier in one product's supply chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Unique supplier identifier.
    pub id: SupplierId,
    /// The product whose supply chain this supplier belongs to.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Contact address for invitations.
    pub email: String,
    /// Distance from the manufacturer in hops; 1 = direct supplier.
    pub tier: u32,
    /// Weak reference to the supplier this one delivers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_supplier_id: Option<SupplierId>,
    /// Disclosure progress.
    pub status: SupplierStatus,
    /// When the supplier last submitted a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_date: Option<Timestamp>,
}

impl Supplier {
    /// Create a pending supplier with a fresh identifier.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        email: impl Into<String>,
        tier: u32,
        parent_supplier_id: Option<SupplierId>,
    ) -> Self {
        Self {
            id: SupplierId::new(),
            product_id,
            name: name.into(),
            email: email.into(),
            tier,
            parent_supplier_id,
            status: SupplierStatus::Pending,
            response_date: None,
        }
    }

    /// Whether this supplier has no parent reference.
    pub fn is_top_level(&self) -> bool {
        self.parent_supplier_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_spelling_is_upper_case() {
        let json = serde_json::to_string(&SupplierStatus::Responded).unwrap();
        assert_eq!(json, "\"RESPONDED\"");
    }

    #[test]
    fn status_rejects_lower_case() {
        let parsed: Result<SupplierStatus, _> = serde_json::from_str("\"pending\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn responded_and_verified_count_as_responded() {
        assert!(!SupplierStatus::Pending.has_responded());
        assert!(SupplierStatus::Responded.has_responded());
        assert!(SupplierStatus::Verified.has_responded());
    }

    #[test]
    fn new_supplier_is_pending() {
        let s = Supplier::new(ProductId::new(), "Acme", "ops@acme.test", 1, None);
        assert_eq!(s.status, SupplierStatus::Pending);
        assert!(s.is_top_level());
        assert!(s.response_date.is_none());
    }

    #[test]
    fn supplier_json_uses_camel_case() {
        let parent = SupplierId::new();
        let s = Supplier::new(ProductId::new(), "Mill", "mill@example.test", 2, Some(parent));
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["parentSupplierId"], serde_json::json!(parent.to_string()));
        assert!(value.get("responseDate").is_none());
    }
}
