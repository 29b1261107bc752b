//! Service wiring.

use std::sync::Arc;

use crate::blob::BlobStore;
use crate::catalog::CatalogService;
use crate::config::DisclosureConfig;
use crate::integrity::DocumentIntegrityService;
use crate::invitation::InvitationService;
use crate::report::ReportService;
use crate::repository::DisclosureRepository;
use crate::submission::SubmissionService;

/// Every disclosure service, sharing one repository and one blob store.
///
/// Cloning is cheap; all collaborators are behind `Arc`.
#[derive(Clone)]
pub struct DisclosureServices {
    pub catalog: CatalogService,
    pub invitations: InvitationService,
    pub submissions: SubmissionService,
    pub integrity: DocumentIntegrityService,
    pub reports: ReportService,
}

impl DisclosureServices {
    pub fn new(
        config: DisclosureConfig,
        repo: Arc<dyn DisclosureRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let integrity = DocumentIntegrityService::new(config.integrity, blobs, repo.clone());
        Self {
            catalog: CatalogService::new(repo.clone()),
            invitations: InvitationService::new(config.invitation, repo.clone()),
            submissions: SubmissionService::new(repo.clone(), integrity.clone()),
            integrity,
            reports: ReportService::new(config.report, repo),
        }
    }
}
