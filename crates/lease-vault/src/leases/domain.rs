use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fingerprint::AuditFingerprint;

/// The three fixed roles a lease directory can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentTier {
    Templates,
    Working,
    Completed,
}

impl DocumentTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Templates, Self::Working, Self::Completed]
    }

    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Templates => "LeaseTemplates",
            Self::Working => "WorkingLeaseTemplates",
            Self::Completed => "CompletedLeaseAgreements",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Templates => "Master Templates",
            Self::Working => "Working Drafts",
            Self::Completed => "Completed Agreements",
        }
    }
}

/// Caller-supplied description of the lease being finalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaseCreationData {
    #[serde(default)]
    pub lease_id: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub farmer_name: Option<String>,
    pub growing_year: i32,
    #[serde(default)]
    pub lease_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub rent_amount: Option<Decimal>,
    #[serde(default)]
    pub rent_frequency: Option<String>,
}

impl LeaseCreationData {
    pub fn for_year(growing_year: i32) -> Self {
        Self {
            growing_year,
            ..Self::default()
        }
    }
}

/// A finalized agreement. Immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedLease {
    /// Generated at creation; unrelated to `lease_data.lease_id`.
    pub id: Uuid,
    pub file_name: String,
    pub file_path: PathBuf,
    pub content_hash: AuditFingerprint,
    pub lease_data: LeaseCreationData,
}

impl CompletedLease {
    pub fn short_hash(&self) -> &str {
        self.content_hash.short()
    }

    pub fn info(&self) -> CreatedLeaseInfo {
        CreatedLeaseInfo {
            id: self.id,
            file_name: self.file_name.clone(),
            file_path: self.file_path.clone(),
            file_hash: self.content_hash.as_str().to_string(),
            short_hash: self.short_hash().to_string(),
            lease_data: self.lease_data.clone(),
        }
    }
}

/// Result handed back to collaborators after a lease is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedLeaseInfo {
    pub id: Uuid,
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_hash: String,
    pub short_hash: String,
    pub lease_data: LeaseCreationData,
}

/// Read model over an existing completed-lease file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaseFileInfo {
    pub file_name: String,
    pub file_path: PathBuf,
    pub creation_date: DateTime<Utc>,
    pub file_size: u64,
    pub year: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum LeaseError {
    #[error("lease template '{name}' not found")]
    TemplateNotFound { name: String },
    #[error("working lease draft '{name}' not found")]
    WorkingTemplateNotFound { name: String },
    #[error("could not create lease file at {}: {reason}", path.display())]
    FileCreationFailed { path: PathBuf, reason: String },
    #[error("file access failed for {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid lease template: {reason}")]
    InvalidTemplate { reason: String },
    #[error("could not create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{name}' is not a valid document name")]
    InvalidDocumentName { name: String },
}

impl LeaseError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. } | Self::WorkingTemplateNotFound { .. }
        )
    }
}

/// Template and draft names become file stems, so they may not escape their tier directory.
pub(crate) fn validate_document_name(name: &str) -> Result<(), LeaseError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(LeaseError::InvalidDocumentName {
            name: name.to_string(),
        });
    }
    Ok(())
}
