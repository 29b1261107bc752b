//! # Supplier Status Lifecycle
//!
//! ## States
//!
//! ```text
//! Pending ──response──▶ Responded ──confirm──▶ Verified
//!                        │    ▲
//!                        └────┘ response (date refreshed)
//! ```
//!
//! A submitted response moves a `Pending` supplier to `Responded` and
//! stamps `response_date`. Further responses refresh the date. A `Verified`
//! supplier is never downgraded by a later response; only the date moves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sct_core::{SctError, Supplier, SupplierStatus, Timestamp};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors from supplier status transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupplierError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid supplier transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: SupplierStatus,
        /// Attempted target state.
        to: SupplierStatus,
    },
}

impl From<SupplierError> for SctError {
    fn from(e: SupplierError) -> Self {
        SctError::InvalidInput(e.to_string())
    }
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of a supplier status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierTransitionRecord {
    /// State before the transition.
    pub from_state: SupplierStatus,
    /// State after the transition.
    pub to_state: SupplierStatus,
    /// When the transition occurred.
    pub timestamp: Timestamp,
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// Transition rules for [`Supplier::status`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierLifecycle;

impl SupplierLifecycle {
    /// Status a supplier in `current` moves to after submitting a response.
    pub fn status_after_response(current: SupplierStatus) -> SupplierStatus {
        match current {
            SupplierStatus::Pending | SupplierStatus::Responded => SupplierStatus::Responded,
            SupplierStatus::Verified => SupplierStatus::Verified,
        }
    }

    /// Apply a submitted response to `supplier`. Always succeeds.
    pub fn record_response(supplier: &mut Supplier, at: Timestamp) -> SupplierTransitionRecord {
        let from = supplier.status;
        let to = Self::status_after_response(from);
        supplier.status = to;
        supplier.response_date = Some(at);
        SupplierTransitionRecord {
            from_state: from,
            to_state: to,
            timestamp: at,
        }
    }

    /// Operator confirmation (RESPONDED → VERIFIED).
    pub fn confirm_verified(
        supplier: &mut Supplier,
        at: Timestamp,
    ) -> Result<SupplierTransitionRecord, SupplierError> {
        if supplier.status != SupplierStatus::Responded {
            return Err(SupplierError::InvalidTransition {
                from: supplier.status,
                to: SupplierStatus::Verified,
            });
        }
        supplier.status = SupplierStatus::Verified;
        tracing::info!(supplier_id = %supplier.id, "supplier disclosure verified");
        Ok(SupplierTransitionRecord {
            from_state: SupplierStatus::Responded,
            to_state: SupplierStatus::Verified,
            timestamp: at,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
