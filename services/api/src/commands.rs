use crate::cli::CreateLeaseArgs;
use lease_vault::error::AppError;
use lease_vault::leases::{AuditFingerprinter, LeaseCreationData, LeaseDocumentService};
use std::io::Write;
use std::path::Path;

pub(crate) fn list_templates(
    service: &LeaseDocumentService,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let templates = service.list_templates()?;
    if templates.is_empty() {
        writeln!(out, "No master templates found")?;
    }
    for name in templates {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub(crate) fn copy_draft(
    service: &LeaseDocumentService,
    template: &str,
    working: &str,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let path = service.copy_template_to_working(template, working)?;
    writeln!(out, "Copied {template} to {}", path.display())?;
    Ok(())
}

pub(crate) fn list_drafts(
    service: &LeaseDocumentService,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let drafts = service.list_working_drafts()?;
    if drafts.is_empty() {
        writeln!(out, "No working drafts found")?;
    }
    for name in drafts {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

pub(crate) fn create_lease(
    service: &LeaseDocumentService,
    args: CreateLeaseArgs,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let data = LeaseCreationData {
        lease_id: args.lease_id,
        property_name: args.property,
        farmer_name: args.farmer,
        growing_year: args.year,
        lease_type: args.lease_type,
        start_date: args.start,
        end_date: args.end,
        rent_amount: args.rent,
        rent_frequency: args.frequency,
    };

    let lease = service.create_completed_lease(&args.draft, &data)?;
    writeln!(out, "Created {}", lease.file_name)?;
    writeln!(out, "  Path: {}", lease.file_path.display())?;
    writeln!(out, "  SHA-256: {}", lease.content_hash)?;
    writeln!(out, "  Short hash: {}", lease.short_hash())?;
    Ok(())
}

pub(crate) fn list_years(
    service: &LeaseDocumentService,
    out: &mut impl Write,
) -> Result<(), AppError> {
    for year in service.list_years()? {
        writeln!(out, "{year}")?;
    }
    Ok(())
}

pub(crate) fn list_files(
    service: &LeaseDocumentService,
    year: i32,
    csv: bool,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if csv {
        service.export_year_manifest(year, out)?;
        return Ok(());
    }

    let files = service.list_files(year)?;
    if files.is_empty() {
        writeln!(out, "No completed leases for {year}")?;
    }
    for file in files {
        writeln!(
            out,
            "{}  {:>8} bytes  {}",
            file.file_name,
            file.file_size,
            file.creation_date.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }
    Ok(())
}

/// Hashes any file on disk; no lease tree is opened or created.
pub(crate) fn hash(path: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let fingerprint = AuditFingerprinter.hash_file(path)?;
    writeln!(out, "{fingerprint}  {}", path.display())?;
    Ok(())
}
