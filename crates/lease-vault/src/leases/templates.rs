use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::atomic::atomic_write;
use super::directories::DirectoryRegistry;
use super::domain::{validate_document_name, DocumentTier, LeaseError};

/// Read-only view over the master templates tier.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    registry: DirectoryRegistry,
}

impl TemplateStore {
    pub fn new(registry: DirectoryRegistry) -> Self {
        Self { registry }
    }

    /// Template names without the `.md` extension, sorted.
    pub fn list_templates(&self) -> Result<Vec<String>, LeaseError> {
        markdown_stems(&self.registry.path_for(DocumentTier::Templates))
    }

    pub fn read_template(&self, name: &str) -> Result<String, LeaseError> {
        let bytes = self.read_template_bytes(name)?;
        let path = self.registry.template_path(name);
        String::from_utf8(bytes).map_err(|err| {
            LeaseError::file_access(path, io::Error::new(io::ErrorKind::InvalidData, err))
        })
    }

    fn read_template_bytes(&self, name: &str) -> Result<Vec<u8>, LeaseError> {
        validate_document_name(name)?;
        let path = self.registry.template_path(name);
        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LeaseError::TemplateNotFound {
                name: name.to_string(),
            },
            _ => LeaseError::file_access(&path, source),
        })
    }
}

/// Materializes working drafts from master templates.
#[derive(Debug, Clone)]
pub struct WorkingCopyService {
    registry: DirectoryRegistry,
    templates: TemplateStore,
}

impl WorkingCopyService {
    pub fn new(registry: DirectoryRegistry) -> Self {
        let templates = TemplateStore::new(registry.clone());
        Self {
            registry,
            templates,
        }
    }

    /// Byte-for-byte copy of `templates/<template>.md` to `working/<working>.md`.
    ///
    /// An existing draft with the same name is replaced.
    pub fn copy_template_to_working(
        &self,
        template_name: &str,
        working_name: &str,
    ) -> Result<PathBuf, LeaseError> {
        validate_document_name(working_name)?;
        let content = self.templates.read_template_bytes(template_name)?;

        let destination = self.registry.working_path(working_name);
        atomic_write(&destination, &content)
            .map_err(|source| LeaseError::file_access(&destination, source))?;

        info!(
            template = template_name,
            draft = working_name,
            bytes = content.len(),
            "working draft materialized"
        );
        Ok(destination)
    }

    pub fn list_working_drafts(&self) -> Result<Vec<String>, LeaseError> {
        markdown_stems(&self.registry.path_for(DocumentTier::Working))
    }

    pub fn read_working_draft(&self, name: &str) -> Result<String, LeaseError> {
        validate_document_name(name)?;
        let path = self.registry.working_path(name);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LeaseError::WorkingTemplateNotFound {
                name: name.to_string(),
            },
            _ => LeaseError::file_access(&path, source),
        })
    }
}

fn markdown_stems(dir: &Path) -> Result<Vec<String>, LeaseError> {
    let entries = fs::read_dir(dir).map_err(|source| LeaseError::file_access(dir, source))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LeaseError::file_access(dir, source))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            if !stem.starts_with('.') {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
