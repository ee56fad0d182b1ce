//! SHA-256 audit fingerprints bound to the exact bytes of a finalized lease.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::domain::LeaseError;

const SHORT_HASH_LEN: usize = 8;
const FULL_HASH_LEN: usize = 64;

/// 64-character lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct AuditFingerprint(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a 64-character lowercase hex SHA-256 digest")]
pub struct InvalidFingerprint {
    pub value: String,
}

impl TryFrom<String> for AuditFingerprint {
    type Error = InvalidFingerprint;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let valid = value.len() == FULL_HASH_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid {
            Ok(Self(value))
        } else {
            Err(InvalidFingerprint { value })
        }
    }
}

impl From<AuditFingerprint> for String {
    fn from(value: AuditFingerprint) -> Self {
        value.0
    }
}

impl AuditFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading eight hex characters of the full digest.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_HASH_LEN]
    }
}

impl fmt::Display for AuditFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditFingerprinter;

impl AuditFingerprinter {
    pub fn fingerprint(&self, content: &[u8]) -> AuditFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(content);
        AuditFingerprint(hex::encode(hasher.finalize()))
    }

    /// Hash the whole file as it currently sits on disk.
    pub fn hash_file(&self, path: &Path) -> Result<AuditFingerprint, LeaseError> {
        let content = fs::read(path).map_err(|source| LeaseError::file_access(path, source))?;
        Ok(self.fingerprint(&content))
    }
}
