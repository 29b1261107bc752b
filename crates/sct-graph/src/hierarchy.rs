//! # Supplier Forest Reconstruction
//!
//! Builds a forest of [`SupplyChainNode`]s from the flat supplier list of one
//! product in linear time:
//!
//! 1. Index supplier id → input position (first occurrence wins).
//! 2. Resolve every parent reference to a position. Unknown parents are cut.
//! 3. Find parent cycles with a three-colour walk over the parent pointers.
//!    Each cycle is cut at its member that appears first in the input; that
//!    member becomes a root.
//! 4. Link children in input order and assemble the nodes bottom-up with an
//!    explicit stack.
//!
//! Root order and child order are the input order. Every cut is reported as
//! a [`HierarchyDiagnostic`] and logged at `warn`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use sct_core::{Supplier, SupplierId, SupplierStatus};

// ─── Output types ────────────────────────────────────────────────────

/// One supplier in the reconstructed hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainNode {
    pub id: SupplierId,
    pub name: String,
    pub tier: u32,
    pub status: SupplierStatus,
    pub children: Vec<SupplyChainNode>,
}

// Deep chains must not overflow the stack on drop.
impl Drop for SupplyChainNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// Something the builder had to repair to produce a forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyDiagnostic {
    /// A later record reused an id already seen; it was dropped.
    DuplicateId { supplier: SupplierId },
    /// The parent reference points outside the input set; treated as root.
    MissingParent {
        supplier: SupplierId,
        parent: SupplierId,
    },
    /// A parent loop was cut at `supplier`, which became a root.
    CycleBroken {
        supplier: SupplierId,
        /// Loop members in parent-walk order, starting from the first one
        /// reached.
        members: Vec<SupplierId>,
    },
}

impl std::fmt::Display for HierarchyDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { supplier } => write!(f, "duplicate supplier id {supplier}"),
            Self::MissingParent { supplier, parent } => {
                write!(f, "supplier {supplier} references unknown parent {parent}")
            }
            Self::CycleBroken { supplier, members } => {
                let path: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(
                    f,
                    "parent cycle {} broken at supplier {supplier}",
                    path.join(" -> ")
                )
            }
        }
    }
}

/// The reconstructed supplier hierarchy of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChainForest {
    pub roots: Vec<SupplyChainNode>,
    pub diagnostics: Vec<HierarchyDiagnostic>,
}

impl SupplyChainForest {
    /// Whether the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&SupplyChainNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Look up a node anywhere in the forest.
    pub fn find(&self, id: &SupplierId) -> Option<&SupplyChainNode> {
        let mut stack: Vec<&SupplyChainNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if &node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Whether any parent cycle had to be cut.
    pub fn had_cycles(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, HierarchyDiagnostic::CycleBroken { .. }))
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Reconstructs supplier forests from flat records.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplyChainGraphBuilder;

impl SupplyChainGraphBuilder {
    /// Build the forest for `suppliers`. Never fails.
    pub fn build(suppliers: &[Supplier]) -> SupplyChainForest {
        let n = suppliers.len();
        let mut diagnostics = Vec::new();

        let mut index: HashMap<SupplierId, usize> = HashMap::with_capacity(n);
        let mut active = vec![true; n];
        for (i, s) in suppliers.iter().enumerate() {
            if index.contains_key(&s.id) {
                active[i] = false;
                diagnostics.push(HierarchyDiagnostic::DuplicateId { supplier: s.id });
            } else {
                index.insert(s.id, i);
            }
        }

        let mut parent: Vec<Option<usize>> = vec![None; n];
        for (i, s) in suppliers.iter().enumerate() {
            let Some(parent_id) = s.parent_supplier_id.filter(|_| active[i]) else {
                continue;
            };
            match index.get(&parent_id) {
                Some(&j) => parent[i] = Some(j),
                None => diagnostics.push(HierarchyDiagnostic::MissingParent {
                    supplier: s.id,
                    parent: parent_id,
                }),
            }
        }

        for cycle in parent_cycles(&parent) {
            let Some(&cut) = cycle.iter().min() else {
                continue;
            };
            parent[cut] = None;
            diagnostics.push(HierarchyDiagnostic::CycleBroken {
                supplier: suppliers[cut].id,
                members: cycle.iter().map(|&i| suppliers[i].id).collect(),
            });
        }

        for d in &diagnostics {
            tracing::warn!(diagnostic = %d, "supplier hierarchy repaired");
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots = Vec::new();
        for i in (0..n).filter(|&i| active[i]) {
            match parent[i] {
                Some(p) => children[p].push(i),
                None => roots.push(i),
            }
        }

        // Pre-order from the roots; reversed, every child precedes its parent.
        let mut order = Vec::with_capacity(n);
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(children[i].iter().rev());
        }

        let mut built: Vec<Option<SupplyChainNode>> = (0..n).map(|_| None).collect();
        for &i in order.iter().rev() {
            let kids: Vec<SupplyChainNode> = children[i]
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            let s = &suppliers[i];
            built[i] = Some(SupplyChainNode {
                id: s.id,
                name: s.name.clone(),
                tier: s.tier,
                status: s.status,
                children: kids,
            });
        }

        SupplyChainForest {
            roots: roots.iter().filter_map(|&r| built[r].take()).collect(),
            diagnostics,
        }
    }
}

/// Every cycle in a parent-pointer array, members in walk order.
///
/// Each position has at most one parent, so cycles are disjoint and each is
/// reported once.
pub(crate) fn parent_cycles(parent: &[Option<usize>]) -> Vec<Vec<usize>> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unseen,
        OnPath,
        Done,
    }

    let mut mark = vec![Mark::Unseen; parent.len()];
    let mut cycles = Vec::new();
    let mut path: Vec<usize> = Vec::new();

    for start in 0..parent.len() {
        if mark[start] != Mark::Unseen {
            continue;
        }
        path.clear();
        let mut cur = Some(start);
        while let Some(i) = cur {
            match mark[i] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(pos) = path.iter().position(|&p| p == i) {
                        cycles.push(path[pos..].to_vec());
                    }
                    break;
                }
                Mark::Unseen => {
                    mark[i] = Mark::OnPath;
                    path.push(i);
                    cur = parent[i];
                }
            }
        }
        for &i in &path {
            mark[i] = Mark::Done;
        }
    }
    cycles
}
