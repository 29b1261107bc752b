//! # Supply-chain tree and score
//!
//! Both subcommands read a product snapshot as JSON: either a full
//! `ProductSnapshot` object (`{"product": .., "suppliers": [..], ..}`) or,
//! for `tree`, a bare array of suppliers.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use sct_core::{ProductSnapshot, Supplier};
use sct_graph::{validate_hierarchy, SupplyChainGraphBuilder};
use sct_score::{ScoreInputs, TransparencyScore, TransparencyScorer};

use crate::{print_json, read_json};

/// Arguments for `sct tree`.
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Snapshot or supplier-array JSON (`-` for stdin).
    pub input: PathBuf,

    /// Also check hierarchy invariants; exit 1 on any violation.
    #[arg(long)]
    pub audit: bool,
}

/// Arguments for `sct score`.
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Snapshot JSON (`-` for stdin).
    pub input: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SupplierInput {
    Suppliers(Vec<Supplier>),
    Snapshot(ProductSnapshot),
}

impl SupplierInput {
    fn into_suppliers(self) -> Vec<Supplier> {
        match self {
            Self::Suppliers(s) => s,
            Self::Snapshot(snap) => snap.suppliers,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReport {
    inputs: ScoreInputs,
    #[serde(flatten)]
    score: TransparencyScore,
}

pub fn run_tree(args: &TreeArgs) -> Result<u8> {
    let suppliers = read_json::<SupplierInput>(&args.input)?.into_suppliers();
    let forest = SupplyChainGraphBuilder::build(&suppliers);
    print_json(&forest)?;

    if args.audit {
        let violations = validate_hierarchy(&suppliers);
        for v in &violations {
            eprintln!("violation: {v}");
        }
        if !violations.is_empty() {
            return Ok(1);
        }
    }
    Ok(0)
}

pub fn run_score(args: &ScoreArgs) -> Result<u8> {
    let snapshot: ProductSnapshot = read_json(&args.input)?;
    let inputs = ScoreInputs::from_snapshot(&snapshot);
    let score = TransparencyScorer::score_inputs(&inputs);
    print_json(&ScoreReport { inputs, score })?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sct_core::{ProductId, SupplierId};

    fn write(dir: &tempfile::TempDir, name: &str, value: &impl Serialize) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn supplier_input_accepts_array_and_snapshot() {
        let product = ProductId::new();
        let a = Supplier::new(product, "Mill", "mill@example.test", 1, None);
        let array: SupplierInput = serde_json::from_value(serde_json::json!([a.clone()])).unwrap();
        assert_eq!(array.into_suppliers().len(), 1);

        let snap = ProductSnapshot {
            suppliers: vec![a],
            ..Default::default()
        };
        let obj: SupplierInput = serde_json::from_value(serde_json::to_value(&snap).unwrap()).unwrap();
        assert_eq!(obj.into_suppliers().len(), 1);
    }

    #[test]
    fn tree_audit_fails_on_violations() {
        let dir = tempfile::tempdir().unwrap();
        let product = ProductId::new();
        let ok = Supplier::new(product, "Mill", "mill@example.test", 1, None);
        let path = write(&dir, "ok.json", &vec![ok.clone()]);
        assert_eq!(run_tree(&TreeArgs { input: path, audit: true }).unwrap(), 0);

        let orphan = Supplier::new(product, "Farm", "farm@example.test", 2, Some(SupplierId::new()));
        let path = write(&dir, "bad.json", &vec![ok, orphan]);
        assert_eq!(
            run_tree(&TreeArgs {
                input: path.clone(),
                audit: false
            })
            .unwrap(),
            0
        );
        assert_eq!(run_tree(&TreeArgs { input: path, audit: true }).unwrap(), 1);
    }

    #[test]
    fn score_reads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "snap.json", &ProductSnapshot::default());
        assert_eq!(run_score(&ScoreArgs { input: path }).unwrap(), 0);
    }
}
