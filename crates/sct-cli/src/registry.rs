//! # Supplier registration checks
//!
//! `sct gstin` validates a GSTIN and, with `--lookup`, resolves it through
//! the configured lookup adapter. `sct msme` validates a Udyam number and/or
//! categorizes an enterprise by investment and turnover.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use sct_compliance::{
    categorize, verify_gstin, EnterpriseCategory, Gstin, GstinLookup, MockGstinLookup,
    UdyamNumber,
};
use sct_disclosure::ComplianceConfig;

use crate::print_json;

/// Arguments for `sct gstin`.
#[derive(Args, Debug)]
pub struct GstinArgs {
    /// 15-character GSTIN.
    pub gstin: String,

    /// Resolve the registration and require it to be active.
    #[arg(long)]
    pub lookup: bool,
}

/// Arguments for `sct msme`.
#[derive(Args, Debug)]
pub struct MsmeArgs {
    /// Udyam registration number (`UDYAM-XX-00-0000000`).
    #[arg(long)]
    pub udyam: Option<String>,

    /// Investment in plant and machinery, in rupees.
    #[arg(long, requires = "turnover")]
    pub investment: Option<u64>,

    /// Annual turnover, in rupees.
    #[arg(long, requires = "investment")]
    pub turnover: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GstinSummary<'a> {
    gstin: &'a str,
    state_code: &'a str,
    state_name: &'a str,
    pan: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MsmeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    udyam: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    udyam_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<EnterpriseCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_msme: Option<bool>,
}

/// The lookup adapter for `config`.
///
/// No live GST client ships with this tool; the mock is used either way.
pub fn gstin_lookup(config: &ComplianceConfig) -> Box<dyn GstinLookup> {
    if config.has_credentials() {
        tracing::warn!(
            api_url = %config.gst_api_url,
            "GST API key configured but no live client is built in; using mock lookup"
        );
    }
    Box::new(MockGstinLookup)
}

pub fn run_gstin(args: &GstinArgs, config: &ComplianceConfig) -> Result<u8> {
    let gstin = match Gstin::parse(&args.gstin) {
        Ok(g) => g,
        Err(e) => {
            println!("INVALID  {e}");
            return Ok(1);
        }
    };

    if !args.lookup {
        print_json(&GstinSummary {
            gstin: gstin.as_str(),
            state_code: gstin.state_code(),
            state_name: gstin.state_name(),
            pan: gstin.pan(),
        })?;
        return Ok(0);
    }

    let lookup = gstin_lookup(config);
    match verify_gstin(lookup.as_ref(), gstin.as_str()) {
        Ok(details) => {
            print_json(&details)?;
            Ok(0)
        }
        Err(e) => {
            println!("NOT VERIFIED  {e}");
            Ok(1)
        }
    }
}

pub fn run_msme(args: &MsmeArgs) -> Result<u8> {
    if args.udyam.is_none() && args.investment.is_none() {
        anyhow::bail!("pass --udyam and/or --investment with --turnover");
    }

    let mut summary = MsmeSummary {
        udyam: None,
        udyam_state: None,
        category: None,
        is_msme: None,
    };
    if let Some(raw) = &args.udyam {
        match UdyamNumber::parse(raw) {
            Ok(u) => {
                summary.udyam_state = Some(u.state().to_string());
                summary.udyam = Some(u.as_str().to_string());
            }
            Err(e) => {
                println!("INVALID  {e}");
                return Ok(1);
            }
        }
    }
    if let (Some(investment), Some(turnover)) = (args.investment, args.turnover) {
        let category = categorize(investment, turnover);
        summary.is_msme = Some(category.is_msme());
        summary.category = Some(category);
    }
    print_json(&summary)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "27AAPFU0939F1ZV";

    #[test]
    fn gstin_exit_codes() {
        let config = ComplianceConfig::default();
        let ok = GstinArgs {
            gstin: VALID.into(),
            lookup: true,
        };
        assert_eq!(run_gstin(&ok, &config).unwrap(), 0);

        let bad = GstinArgs {
            gstin: "27aapfu0939f1zv".into(),
            lookup: false,
        };
        assert_eq!(run_gstin(&bad, &config).unwrap(), 1);

        let cancelled = GstinArgs {
            gstin: "27AAPFU0939F9ZV".into(),
            lookup: true,
        };
        assert_eq!(run_gstin(&cancelled, &config).unwrap(), 1);
    }

    #[test]
    fn msme_requires_some_input() {
        let none = MsmeArgs {
            udyam: None,
            investment: None,
            turnover: None,
        };
        assert!(run_msme(&none).is_err());

        let both = MsmeArgs {
            udyam: Some("UDYAM-MH-01-0000001".into()),
            investment: Some(500_000),
            turnover: Some(2_000_000),
        };
        assert_eq!(run_msme(&both).unwrap(), 0);

        let bad = MsmeArgs {
            udyam: Some("UDYAM-MH-1-0000001".into()),
            investment: None,
            turnover: None,
        };
        assert_eq!(run_msme(&bad).unwrap(), 1);
    }
}
