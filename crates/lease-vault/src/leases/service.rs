use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::directories::DirectoryRegistry;
use super::domain::{CompletedLease, LeaseCreationData, LeaseError, LeaseFileInfo};
use super::fingerprint::{AuditFingerprint, AuditFingerprinter};
use super::index::YearIndex;
use super::naming::SuffixSource;
use super::persister::VersionedPersister;
use super::templates::{TemplateStore, WorkingCopyService};

/// Service composing the directory registry, template tiers, persister, and index.
///
/// Built around an explicit root so independent instances (and tests) never share state.
#[derive(Debug)]
pub struct LeaseDocumentService {
    registry: DirectoryRegistry,
    templates: TemplateStore,
    drafts: WorkingCopyService,
    persister: VersionedPersister,
    index: YearIndex,
    fingerprinter: AuditFingerprinter,
}

impl LeaseDocumentService {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LeaseError> {
        let registry = DirectoryRegistry::open(root)?;
        Ok(Self {
            templates: TemplateStore::new(registry.clone()),
            drafts: WorkingCopyService::new(registry.clone()),
            persister: VersionedPersister::new(registry.clone()),
            index: YearIndex::new(registry.clone()),
            fingerprinter: AuditFingerprinter,
            registry,
        })
    }

    /// Replace the unique-suffix generator used for new lease names.
    pub fn with_suffix_source(mut self, suffixes: Arc<dyn SuffixSource>) -> Self {
        self.persister = VersionedPersister::with_suffix_source(self.registry.clone(), suffixes);
        self
    }

    pub fn registry(&self) -> &DirectoryRegistry {
        &self.registry
    }

    pub fn list_templates(&self) -> Result<Vec<String>, LeaseError> {
        self.templates.list_templates()
    }

    pub fn read_template(&self, name: &str) -> Result<String, LeaseError> {
        self.templates.read_template(name)
    }

    pub fn copy_template_to_working(
        &self,
        template_name: &str,
        working_name: &str,
    ) -> Result<PathBuf, LeaseError> {
        self.drafts
            .copy_template_to_working(template_name, working_name)
    }

    pub fn list_working_drafts(&self) -> Result<Vec<String>, LeaseError> {
        self.drafts.list_working_drafts()
    }

    pub fn read_working_draft(&self, name: &str) -> Result<String, LeaseError> {
        self.drafts.read_working_draft(name)
    }

    pub fn create_completed_lease(
        &self,
        working_draft_name: &str,
        data: &LeaseCreationData,
    ) -> Result<CompletedLease, LeaseError> {
        self.persister
            .create_completed_lease(working_draft_name, data)
    }

    pub fn create_completed_lease_at(
        &self,
        working_draft_name: &str,
        data: &LeaseCreationData,
        created_at: DateTime<Utc>,
    ) -> Result<CompletedLease, LeaseError> {
        self.persister
            .create_completed_lease_at(working_draft_name, data, created_at)
    }

    pub fn list_years(&self) -> Result<Vec<i32>, LeaseError> {
        self.index.list_years()
    }

    pub fn list_files(&self, year: i32) -> Result<Vec<LeaseFileInfo>, LeaseError> {
        self.index.list_files(year)
    }

    pub fn export_year_manifest<W: Write>(&self, year: i32, writer: W) -> Result<usize, LeaseError> {
        self.index.export_csv(year, writer)
    }

    pub fn hash_file(&self, path: &Path) -> Result<AuditFingerprint, LeaseError> {
        self.fingerprinter.hash_file(path)
    }
}
