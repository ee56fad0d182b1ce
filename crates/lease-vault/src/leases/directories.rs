use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::domain::{DocumentTier, LeaseError};

/// Owns the three-tier layout under a lease root.
#[derive(Debug, Clone)]
pub struct DirectoryRegistry {
    root: PathBuf,
}

impl DirectoryRegistry {
    /// Create the root and every tier directory. Safe to call against an existing layout.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LeaseError> {
        let registry = Self { root: root.into() };
        ensure_dir(&registry.root)?;
        for tier in DocumentTier::ordered() {
            ensure_dir(&registry.path_for(tier))?;
        }
        debug!(root = %registry.root.display(), "lease directories ready");
        Ok(registry)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, tier: DocumentTier) -> PathBuf {
        self.root.join(tier.dir_name())
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        markdown_path(&self.path_for(DocumentTier::Templates), name)
    }

    pub fn working_path(&self, name: &str) -> PathBuf {
        markdown_path(&self.path_for(DocumentTier::Working), name)
    }

    pub fn year_path(&self, year: i32) -> PathBuf {
        self.path_for(DocumentTier::Completed).join(year.to_string())
    }

    /// Resolve `completed/<year>/`, creating it when missing.
    pub fn ensure_year_dir(&self, year: i32) -> Result<PathBuf, LeaseError> {
        let path = self.year_path(year);
        ensure_dir(&path)?;
        Ok(path)
    }
}

fn markdown_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.md"))
}

fn ensure_dir(path: &Path) -> Result<(), LeaseError> {
    fs::create_dir_all(path).map_err(|source| LeaseError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}
