//! # sct-graph: Supply-Chain Hierarchy
//!
//! Suppliers are stored flat. Each one may carry a weak `parent_supplier_id`
//! pointing at another supplier of the same product. This crate turns that
//! flat set into a forest of tiered nodes and checks the hierarchy
//! invariants on write.
//!
//! - **Builder** (`hierarchy.rs`): O(n) forest reconstruction. Never loops
//!   or recurses on malformed input: missing parents and parent cycles are
//!   cut, the affected supplier becomes a root, and a diagnostic is emitted.
//! - **Validation** (`validation.rs`): rejects references to unknown
//!   suppliers, cross-product parents, non-decreasing tiers, and cycles.

pub mod hierarchy;
pub mod validation;

pub use hierarchy::{
    HierarchyDiagnostic, SupplyChainForest, SupplyChainGraphBuilder, SupplyChainNode,
};
pub use validation::{check_hierarchy, validate_hierarchy, validate_new_supplier, HierarchyError};
