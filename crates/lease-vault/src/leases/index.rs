use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::directories::DirectoryRegistry;
use super::domain::{DocumentTier, LeaseError, LeaseFileInfo};

/// Read-only browsing over `CompletedLeaseAgreements/<year>/`.
#[derive(Debug, Clone)]
pub struct YearIndex {
    registry: DirectoryRegistry,
}

#[derive(Debug, Serialize)]
struct ManifestRow<'a> {
    file_name: &'a str,
    year: i32,
    created_at: String,
    file_size: u64,
}

impl YearIndex {
    pub fn new(registry: DirectoryRegistry) -> Self {
        Self { registry }
    }

    /// Numeric year directories, newest first.
    pub fn list_years(&self) -> Result<Vec<i32>, LeaseError> {
        let completed = self.registry.path_for(DocumentTier::Completed);
        let entries = match fs::read_dir(&completed) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(LeaseError::file_access(&completed, err)),
        };

        let mut years = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LeaseError::file_access(&completed, source))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(year) = entry
                .file_name()
                .to_str()
                .filter(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|name| name.parse::<i32>().ok())
            {
                years.push(year);
            }
        }
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }

    /// Every `.md` file for `year`, newest first. A missing year is an empty listing.
    pub fn list_files(&self, year: i32) -> Result<Vec<LeaseFileInfo>, LeaseError> {
        let dir = self.registry.year_path(year);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(LeaseError::file_access(&dir, err)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LeaseError::file_access(&dir, source))?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if file_name.starts_with('.') || !file_name.ends_with(".md") {
                continue;
            }
            let metadata = entry
                .metadata()
                .map_err(|source| LeaseError::file_access(&path, source))?;
            if !metadata.is_file() {
                continue;
            }

            files.push(LeaseFileInfo {
                file_name: file_name.to_string(),
                creation_date: creation_date(&path, &metadata)?,
                file_size: metadata.len(),
                file_path: path,
                year,
            });
        }

        files.sort_by(|a, b| {
            b.creation_date
                .cmp(&a.creation_date)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(files)
    }

    /// Write a CSV manifest (`file_name,year,created_at,file_size`) for one year.
    pub fn export_csv<W: Write>(&self, year: i32, writer: W) -> Result<usize, LeaseError> {
        let files = self.list_files(year)?;
        let manifest_path = self.registry.year_path(year);
        let csv_error = |err: csv::Error| {
            LeaseError::file_access(&manifest_path, io::Error::new(io::ErrorKind::Other, err))
        };

        let mut csv = csv::Writer::from_writer(writer);
        for file in &files {
            csv.serialize(ManifestRow {
                file_name: &file.file_name,
                year: file.year,
                created_at: file
                    .creation_date
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                file_size: file.file_size,
            })
            .map_err(csv_error)?;
        }
        csv.flush()
            .map_err(|source| LeaseError::file_access(&manifest_path, source))?;
        Ok(files.len())
    }
}

/// Birth time where the filesystem records it, otherwise last modification.
fn creation_date(path: &Path, metadata: &fs::Metadata) -> Result<DateTime<Utc>, LeaseError> {
    let timestamp = metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|source| LeaseError::file_access(path, source))?;
    Ok(DateTime::<Utc>::from(timestamp))
}
