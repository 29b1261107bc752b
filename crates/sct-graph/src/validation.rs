//! # Hierarchy Invariants
//!
//! A supplier's parent, when present, must:
//!
//! - exist in the same product's supplier set,
//! - have a strictly smaller `tier`,
//! - not lead back to the supplier through its own parent chain.
//!
//! `tier` itself must be at least 1. Write paths call
//! [`validate_new_supplier`] before persisting; [`validate_hierarchy`]
//! audits an existing set and reports every violation.

use std::collections::HashMap;

use thiserror::Error;

use sct_core::{ProductId, SctError, Supplier, SupplierId};

use crate::hierarchy::parent_cycles;

/// A violated hierarchy invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Tier 0 or otherwise out of range.
    #[error("supplier {supplier} has invalid tier {tier}: tiers start at 1")]
    InvalidTier { supplier: SupplierId, tier: u32 },

    /// The parent does not exist.
    #[error("supplier {supplier} references unknown parent {parent}")]
    UnknownParent {
        supplier: SupplierId,
        parent: SupplierId,
    },

    /// The parent belongs to another product.
    #[error("supplier {supplier} (product {product}) cannot have parent {parent} from product {parent_product}")]
    CrossProduct {
        supplier: SupplierId,
        product: ProductId,
        parent: SupplierId,
        parent_product: ProductId,
    },

    /// The parent's tier is not strictly smaller.
    #[error("supplier {supplier} at tier {tier} cannot have parent {parent} at tier {parent_tier}")]
    TierOrder {
        supplier: SupplierId,
        tier: u32,
        parent: SupplierId,
        parent_tier: u32,
    },

    /// The id appears more than once; the first record is authoritative.
    #[error("supplier {supplier} appears more than once")]
    DuplicateId { supplier: SupplierId },

    /// The parent chain loops.
    #[error("supplier hierarchy cycle through {}", display_ids(.members))]
    Cycle { members: Vec<SupplierId> },
}

fn display_ids(ids: &[SupplierId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<HierarchyError> for SctError {
    fn from(e: HierarchyError) -> Self {
        match e {
            HierarchyError::Cycle { members } => SctError::CycleDetected {
                members: members.iter().map(|m| m.to_string()).collect(),
            },
            other => SctError::InvalidInput(other.to_string()),
        }
    }
}

/// Check `candidate` against the suppliers already stored.
///
/// `existing` may contain suppliers of other products; they are only
/// consulted to diagnose cross-product parents.
pub fn validate_new_supplier(
    candidate: &Supplier,
    existing: &[Supplier],
) -> Result<(), HierarchyError> {
    if candidate.tier == 0 {
        return Err(HierarchyError::InvalidTier {
            supplier: candidate.id,
            tier: candidate.tier,
        });
    }
    let Some(parent_id) = candidate.parent_supplier_id else {
        return Ok(());
    };
    if parent_id == candidate.id {
        return Err(HierarchyError::Cycle {
            members: vec![candidate.id],
        });
    }
    let parent = existing
        .iter()
        .find(|s| s.id == parent_id)
        .ok_or(HierarchyError::UnknownParent {
            supplier: candidate.id,
            parent: parent_id,
        })?;
    check_parent(candidate, parent)
}

fn check_parent(child: &Supplier, parent: &Supplier) -> Result<(), HierarchyError> {
    if parent.product_id != child.product_id {
        return Err(HierarchyError::CrossProduct {
            supplier: child.id,
            product: child.product_id,
            parent: parent.id,
            parent_product: parent.product_id,
        });
    }
    if parent.tier >= child.tier {
        return Err(HierarchyError::TierOrder {
            supplier: child.id,
            tier: child.tier,
            parent: parent.id,
            parent_tier: parent.tier,
        });
    }
    Ok(())
}

/// Every invariant violation in one product's supplier set, in input order,
/// followed by any cycles.
///
/// As in the forest builder, the first record for an id wins; later
/// duplicates are reported and otherwise skipped.
pub fn validate_hierarchy(suppliers: &[Supplier]) -> Vec<HierarchyError> {
    let mut index: HashMap<SupplierId, usize> = HashMap::with_capacity(suppliers.len());
    let mut active = vec![true; suppliers.len()];
    let mut errors = Vec::new();
    for (i, s) in suppliers.iter().enumerate() {
        if index.contains_key(&s.id) {
            active[i] = false;
            errors.push(HierarchyError::DuplicateId { supplier: s.id });
        } else {
            index.insert(s.id, i);
        }
    }

    let mut parent = vec![None; suppliers.len()];
    for (i, s) in suppliers.iter().enumerate() {
        if !active[i] {
            continue;
        }
        if s.tier == 0 {
            errors.push(HierarchyError::InvalidTier {
                supplier: s.id,
                tier: s.tier,
            });
        }
        let Some(parent_id) = s.parent_supplier_id else {
            continue;
        };
        match index.get(&parent_id) {
            None => errors.push(HierarchyError::UnknownParent {
                supplier: s.id,
                parent: parent_id,
            }),
            Some(&j) => {
                parent[i] = Some(j);
                if i != j {
                    if let Err(e) = check_parent(s, &suppliers[j]) {
                        errors.push(e);
                    }
                }
            }
        }
    }

    errors.extend(parent_cycles(&parent).into_iter().map(|cycle| {
        HierarchyError::Cycle {
            members: cycle.iter().map(|&i| suppliers[i].id).collect(),
        }
    }));
    errors
}

/// First violation in `suppliers`, if any.
pub fn check_hierarchy(suppliers: &[Supplier]) -> Result<(), HierarchyError> {
    match validate_hierarchy(suppliers).into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sct_core::ErrorKind;

    fn supplier(product: ProductId, tier: u32, parent: Option<SupplierId>) -> Supplier {
        Supplier::new(product, "S", "s@example.test", tier, parent)
    }

    #[test]
    fn top_level_supplier_is_valid() {
        let s = supplier(ProductId::new(), 1, None);
        assert!(validate_new_supplier(&s, &[]).is_ok());
    }

    #[test]
    fn tier_zero_rejected() {
        let s = supplier(ProductId::new(), 0, None);
        assert!(matches!(
            validate_new_supplier(&s, &[]),
            Err(HierarchyError::InvalidTier { tier: 0, .. })
        ));
    }

    #[test]
    fn unknown_parent_rejected() {
        let s = supplier(ProductId::new(), 2, Some(SupplierId::new()));
        let err = validate_new_supplier(&s, &[]).unwrap_err();
        assert!(matches!(err, HierarchyError::UnknownParent { .. }));
        assert_eq!(SctError::from(err).kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn parent_must_have_smaller_tier() {
        let p = ProductId::new();
        let parent = supplier(p, 2, None);
        let same = supplier(p, 2, Some(parent.id));
        let deeper = supplier(p, 3, Some(parent.id));
        assert!(matches!(
            validate_new_supplier(&same, std::slice::from_ref(&parent)),
            Err(HierarchyError::TierOrder { .. })
        ));
        assert!(validate_new_supplier(&deeper, &[parent]).is_ok());
    }

    #[test]
    fn parent_must_share_product() {
        let parent = supplier(ProductId::new(), 1, None);
        let child = supplier(ProductId::new(), 2, Some(parent.id));
        assert!(matches!(
            validate_new_supplier(&child, &[parent]),
            Err(HierarchyError::CrossProduct { .. })
        ));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut s = supplier(ProductId::new(), 1, None);
        s.parent_supplier_id = Some(s.id);
        let err = validate_new_supplier(&s, &[]).unwrap_err();
        assert_eq!(SctError::from(err).kind(), ErrorKind::CycleDetected);
    }

    #[test]
    fn audit_reports_tier_violations_and_cycles() {
        let p = ProductId::new();
        let mut a = supplier(p, 1, None);
        let b = supplier(p, 2, Some(a.id));
        a.parent_supplier_id = Some(b.id);
        let errors = validate_hierarchy(&[a, b]);
        assert!(errors
            .iter()
            .any(|e| matches!(e, HierarchyError::TierOrder { .. })));
        assert!(matches!(errors.last(), Some(HierarchyError::Cycle { members }) if members.len() == 2));
    }

    #[test]
    fn audit_keeps_first_record_for_duplicate_ids() {
        let p = ProductId::new();
        let root = supplier(p, 1, None);
        let child = supplier(p, 2, Some(root.id));
        // Same id as `root`, but at a tier that would break the child's
        // parent check if it were the one indexed.
        let mut shadow = supplier(p, 3, None);
        shadow.id = root.id;
        let errors = validate_hierarchy(&[root.clone(), child, shadow]);
        assert_eq!(errors, vec![HierarchyError::DuplicateId { supplier: root.id }]);
        assert_eq!(
            SctError::from(errors[0].clone()).kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn valid_chain_passes_audit() {
        let p = ProductId::new();
        let a = supplier(p, 1, None);
        let b = supplier(p, 2, Some(a.id));
        let c = supplier(p, 3, Some(b.id));
        assert!(check_hierarchy(&[a, b, c]).is_ok());
    }

    #[test]
    fn cycle_error_message_joins_ids() {
        let a = SupplierId::new();
        let b = SupplierId::new();
        let err = HierarchyError::Cycle {
            members: vec![a, b],
        };
        assert_eq!(
            err.to_string(),
            format!("supplier hierarchy cycle through {a} -> {b}")
        );
    }
}
