//! Disclosure service configuration.
//!
//! One explicit struct per service, grouped in [`DisclosureConfig`] and
//! passed to constructors. Defaults suit local development. Override via
//! environment variables ([`DisclosureConfig::from_env`]) or a YAML document
//! ([`DisclosureConfig::from_yaml_str`]); both paths validate before
//! returning.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use sct_core::{AccessToken, ReportId};

/// Default local frontend, serving both the supplier portal and the public
/// verification page.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
/// Default GST taxpayer search API.
pub const DEFAULT_GST_API_URL: &str = "https://api.gst.gov.in";
/// Default upload size limit: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
/// Default blob fetch timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const DEFAULT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/jpg",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Document upload and re-verification policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityConfig {
    /// Accepted MIME types, compared case-insensitively.
    pub allowed_mime_types: Vec<String>,
    /// Largest accepted upload in bytes.
    pub max_file_size: u64,
    /// Upper bound on a single blob fetch.
    pub fetch_timeout_secs: u64,
    /// Leading path segment for stored blobs.
    pub upload_prefix: String,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            allowed_mime_types: DEFAULT_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            upload_prefix: "uploads".to_string(),
        }
    }
}

impl IntegrityConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Whether `mime` is on the allow list.
    pub fn allows_mime_type(&self, mime: &str) -> bool {
        let mime = mime.trim();
        self.allowed_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
    }
}

/// Supplier invitation links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationConfig {
    /// Base URL of the supplier portal frontend.
    pub portal_base_url: String,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            portal_base_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl InvitationConfig {
    /// `{portal}/supplier-portal?token={token}`
    pub fn portal_link(&self, token: &AccessToken) -> String {
        format!(
            "{}/supplier-portal?token={}",
            self.portal_base_url.trim_end_matches('/'),
            token.as_str()
        )
    }
}

/// Public report verification links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Base URL of the public verification page.
    pub verification_base_url: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            verification_base_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }
}

impl ReportConfig {
    /// `{base}/verify-report/{report_id}`
    pub fn verification_link(&self, report_id: &ReportId) -> String {
        format!(
            "{}/verify-report/{report_id}",
            self.verification_base_url.trim_end_matches('/')
        )
    }
}

/// GST lookup credentials.
///
/// Custom `Debug` implementation redacts the `gst_api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub gst_api_url: String,
    pub gst_api_key: Option<String>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            gst_api_url: DEFAULT_GST_API_URL.to_string(),
            gst_api_key: None,
        }
    }
}

impl std::fmt::Debug for ComplianceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComplianceConfig")
            .field("gst_api_url", &self.gst_api_url)
            .field(
                "gst_api_key",
                &self.gst_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ComplianceConfig {
    /// Whether a live GST client could be configured.
    pub fn has_credentials(&self) -> bool {
        self.gst_api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// All disclosure service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureConfig {
    pub integrity: IntegrityConfig,
    pub invitation: InvitationConfig,
    pub report: ReportConfig,
    pub compliance: ComplianceConfig,
}

impl DisclosureConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables (all optional):
    /// - `SCT_ALLOWED_FILE_TYPES`: comma-separated MIME types
    /// - `SCT_MAX_FILE_SIZE`: bytes (default: 10485760)
    /// - `SCT_FETCH_TIMEOUT_SECS`: (default: 30)
    /// - `SCT_UPLOAD_PREFIX`: (default: `uploads`)
    /// - `SCT_PORTAL_URL`: (default: `http://localhost:3000`)
    /// - `SCT_VERIFICATION_URL`: (default: `http://localhost:3000`)
    /// - `SCT_GST_API_URL`: (default: `https://api.gst.gov.in`)
    /// - `SCT_GST_API_KEY`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(types) = lookup("SCT_ALLOWED_FILE_TYPES") {
            cfg.integrity.allowed_mime_types = types
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = lookup("SCT_MAX_FILE_SIZE") {
            cfg.integrity.max_file_size = parse_number("SCT_MAX_FILE_SIZE", &raw)?;
        }
        if let Some(raw) = lookup("SCT_FETCH_TIMEOUT_SECS") {
            cfg.integrity.fetch_timeout_secs = parse_number("SCT_FETCH_TIMEOUT_SECS", &raw)?;
        }
        if let Some(prefix) = lookup("SCT_UPLOAD_PREFIX") {
            cfg.integrity.upload_prefix = prefix;
        }
        if let Some(url) = lookup("SCT_PORTAL_URL") {
            cfg.invitation.portal_base_url = url;
        }
        if let Some(url) = lookup("SCT_VERIFICATION_URL") {
            cfg.report.verification_base_url = url;
        }
        if let Some(url) = lookup("SCT_GST_API_URL") {
            cfg.compliance.gst_api_url = url;
        }
        cfg.compliance.gst_api_key = lookup("SCT_GST_API_KEY").filter(|k| !k.is_empty());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a YAML document. Missing sections and fields take defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("invitation.portal_base_url", &self.invitation.portal_base_url)?;
        check_url("report.verification_base_url", &self.report.verification_base_url)?;
        check_url("compliance.gst_api_url", &self.compliance.gst_api_url)?;
        if self.integrity.allowed_mime_types.is_empty() {
            return Err(ConfigError::Invalid(
                "integrity.allowed_mime_types must not be empty".into(),
            ));
        }
        if self.integrity.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "integrity.max_file_size must be positive".into(),
            ));
        }
        if self.integrity.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "integrity.fetch_timeout_secs must be positive".into(),
            ));
        }
        let prefix = &self.integrity.upload_prefix;
        if prefix.is_empty()
            || !prefix
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(ConfigError::Invalid(format!(
                "integrity.upload_prefix must be a single [A-Za-z0-9_-] segment, got {prefix:?}"
            )));
        }
        Ok(())
    }
}

fn check_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(field.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            field.to_string(),
            format!("unsupported scheme {:?}", url.scheme()),
        ));
    }
    Ok(())
}

fn parse_number(var: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidNumber(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(String, String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("malformed YAML configuration: {0}")]
    Yaml(String),
}

impl From<ConfigError> for sct_core::SctError {
    fn from(e: ConfigError) -> Self {
        sct_core::SctError::InvalidInput(e.to_string())
    }
}
