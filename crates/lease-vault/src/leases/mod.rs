//! Lease document lifecycle: master templates, working drafts, and executed agreements.
//!
//! Drafts are copied out of the template tier, composed with [`LeaseCreationData`], and
//! written once into `CompletedLeaseAgreements/<year>/` under a versioned, collision-free
//! name together with a SHA-256 audit fingerprint.

mod atomic;
pub mod composer;
pub mod directories;
pub mod domain;
pub mod fingerprint;
pub mod index;
pub mod naming;
pub mod persister;
pub mod router;
pub mod service;
pub mod templates;

#[cfg(test)]
mod tests;

pub use composer::{LeaseComposer, PLACEHOLDERS};
pub use directories::DirectoryRegistry;
pub use domain::{
    CompletedLease, CreatedLeaseInfo, DocumentTier, LeaseCreationData, LeaseError, LeaseFileInfo,
};
pub use fingerprint::{AuditFingerprint, AuditFingerprinter, InvalidFingerprint};
pub use index::YearIndex;
pub use naming::{farm_prefix, LeaseFileName, SuffixSource, UuidSuffixSource, MAX_VERSION};
pub use persister::VersionedPersister;
pub use router::{lease_router, CopyDraftRequest, CreateLeaseRequest};
pub use service::LeaseDocumentService;
pub use templates::{TemplateStore, WorkingCopyService};
