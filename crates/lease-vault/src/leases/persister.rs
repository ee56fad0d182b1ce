use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::atomic::{create_exclusive, ExclusiveWrite};
use super::composer::LeaseComposer;
use super::directories::DirectoryRegistry;
use super::domain::{validate_document_name, CompletedLease, LeaseCreationData, LeaseError};
use super::fingerprint::AuditFingerprinter;
use super::naming::{farm_prefix, LeaseFileName, SuffixSource, UuidSuffixSource, MAX_VERSION};

/// Promotes a working draft into an immutable, uniquely named, fingerprinted agreement.
pub struct VersionedPersister {
    registry: DirectoryRegistry,
    composer: LeaseComposer,
    fingerprinter: AuditFingerprinter,
    suffixes: Arc<dyn SuffixSource>,
}

impl std::fmt::Debug for VersionedPersister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedPersister")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl VersionedPersister {
    pub fn new(registry: DirectoryRegistry) -> Self {
        Self::with_suffix_source(registry, Arc::new(UuidSuffixSource))
    }

    pub fn with_suffix_source(registry: DirectoryRegistry, suffixes: Arc<dyn SuffixSource>) -> Self {
        Self {
            registry,
            composer: LeaseComposer,
            fingerprinter: AuditFingerprinter,
            suffixes,
        }
    }

    pub fn create_completed_lease(
        &self,
        working_draft_name: &str,
        data: &LeaseCreationData,
    ) -> Result<CompletedLease, LeaseError> {
        self.create_completed_lease_at(working_draft_name, data, Utc::now())
    }

    /// Same as [`Self::create_completed_lease`] with an explicit header timestamp.
    pub fn create_completed_lease_at(
        &self,
        working_draft_name: &str,
        data: &LeaseCreationData,
        created_at: DateTime<Utc>,
    ) -> Result<CompletedLease, LeaseError> {
        validate_document_name(working_draft_name)?;
        let draft = self.read_draft(working_draft_name)?;
        let content = self.composer.compose(&draft, data, created_at)?;

        let prefix = farm_prefix(data.property_name.as_deref());
        let suffix = self.suffixes.next_suffix();
        let initial = LeaseFileName::new(&prefix, data.growing_year, 1, &suffix).ok_or_else(|| {
            LeaseError::FileCreationFailed {
                path: self.registry.year_path(data.growing_year),
                reason: format!(
                    "cannot name a lease for farm '{prefix}', year {}, suffix '{suffix}'",
                    data.growing_year
                ),
            }
        })?;

        let year_dir = self.registry.ensure_year_dir(data.growing_year)?;

        let file_name = write_next_version(&year_dir, &initial, content.as_bytes())?;
        let file_path = year_dir.join(file_name.to_string());
        let content_hash = self.fingerprinter.fingerprint(content.as_bytes());

        info!(
            file = %file_name,
            year = data.growing_year,
            short_hash = content_hash.short(),
            draft = working_draft_name,
            "completed lease created"
        );

        Ok(CompletedLease {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            file_path,
            content_hash,
            lease_data: data.clone(),
        })
    }

    fn read_draft(&self, name: &str) -> Result<String, LeaseError> {
        let path = self.registry.working_path(name);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LeaseError::WorkingTemplateNotFound {
                name: name.to_string(),
            },
            _ => LeaseError::file_access(&path, source),
        })
    }
}

/// Claim the lowest free version for `initial`'s farm and year, holding its suffix fixed.
///
/// Versions already present in the directory under any suffix are skipped first, so
/// successive leases for one farm and year count upward. Once that series is full the exact
/// names for this suffix are tried from V01, so only a full farm/year/suffix triple fails.
/// Every write is exclusive; losing a race for a name moves on instead of overwriting.
fn write_next_version(
    year_dir: &Path,
    initial: &LeaseFileName,
    content: &[u8],
) -> Result<LeaseFileName, LeaseError> {
    let taken = versions_in_series(year_dir, initial)?;

    for version in initial.version()..=MAX_VERSION {
        if taken.contains(&version) {
            debug!(version, "lease version already in use in this series");
            continue;
        }
        if let Some(written) = claim_version(year_dir, initial, version, content)? {
            return Ok(written);
        }
    }

    for version in 1..=MAX_VERSION {
        if !taken.contains(&version) {
            continue;
        }
        if let Some(written) = claim_version(year_dir, initial, version, content)? {
            return Ok(written);
        }
    }

    Err(LeaseError::FileCreationFailed {
        path: year_dir.join(initial.to_string()),
        reason: format!("all {MAX_VERSION} versions are taken"),
    })
}

/// Exclusive write of `initial` at `version`; `None` when the name already exists.
fn claim_version(
    year_dir: &Path,
    initial: &LeaseFileName,
    version: u8,
    content: &[u8],
) -> Result<Option<LeaseFileName>, LeaseError> {
    let Some(candidate) = initial.with_version(version) else {
        return Ok(None);
    };
    let path = year_dir.join(candidate.to_string());
    match create_exclusive(&path, content) {
        Ok(ExclusiveWrite::Written) => Ok(Some(candidate)),
        Ok(ExclusiveWrite::AlreadyExists) => {
            warn!(candidate = %candidate, "lease file name already taken");
            Ok(None)
        }
        Err(source) => Err(LeaseError::FileCreationFailed {
            path,
            reason: source.to_string(),
        }),
    }
}

fn versions_in_series(year_dir: &Path, series: &LeaseFileName) -> Result<BTreeSet<u8>, LeaseError> {
    let entries = fs::read_dir(year_dir).map_err(|source| LeaseError::file_access(year_dir, source))?;
    let mut versions = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|source| LeaseError::file_access(year_dir, source))?;
        let Some(name) = entry.file_name().to_str().and_then(LeaseFileName::parse) else {
            continue;
        };
        if name.same_series(series) {
            versions.insert(name.version());
        }
    }
    Ok(versions)
}
