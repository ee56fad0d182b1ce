use std::fs;

use super::common::*;
use crate::leases::{DocumentTier, LeaseError};

#[test]
fn open_lays_out_all_three_tiers() {
    let (service, _dir) = service();

    for tier in DocumentTier::ordered() {
        assert!(service.registry().path_for(tier).is_dir(), "{tier:?} missing");
    }
}

#[test]
fn copy_is_byte_identical_to_master() {
    let (service, _dir) = service();
    seed_draft(&service, "Smith2025");

    let master = fs::read(service.registry().template_path("StandardCashLease")).unwrap();
    let draft = fs::read(service.registry().working_path("Smith2025")).unwrap();
    assert_eq!(master, draft);
    assert_eq!(service.read_working_draft("Smith2025").unwrap(), STANDARD_TEMPLATE);
}

#[test]
fn copy_overwrites_existing_draft_and_leaves_master_alone() {
    let (service, _dir) = service();
    seed_draft(&service, "Draft1");
    fs::write(service.registry().working_path("Draft1"), "edited by hand").unwrap();

    service
        .copy_template_to_working("StandardCashLease", "Draft1")
        .unwrap();

    assert_eq!(service.read_working_draft("Draft1").unwrap(), STANDARD_TEMPLATE);
    assert_eq!(service.read_template("StandardCashLease").unwrap(), STANDARD_TEMPLATE);
}

#[test]
fn copy_from_missing_template_creates_nothing() {
    let (service, _dir) = service();

    let error = service
        .copy_template_to_working("Nope", "Draft1")
        .expect_err("no template");

    assert!(matches!(error, LeaseError::TemplateNotFound { ref name } if name == "Nope"));
    assert!(!service.registry().working_path("Draft1").exists());
    assert!(service.list_working_drafts().unwrap().is_empty());
}

#[test]
fn document_names_cannot_escape_their_tier() {
    let (service, _dir) = service();
    seed_draft(&service, "Draft1");

    for name in ["../Draft1", "a/b", "", " padded"] {
        let error = service
            .copy_template_to_working("StandardCashLease", name)
            .expect_err("rejected name");
        assert!(matches!(error, LeaseError::InvalidDocumentName { .. }), "{name:?}");
    }
}

#[test]
fn template_and_draft_listings_are_sorted_stems() {
    let (service, _dir) = service();
    let templates = service.registry().path_for(DocumentTier::Templates);
    fs::write(templates.join("Share.md"), "# Share\n").unwrap();
    fs::write(templates.join("Cash.md"), "# Cash\n").unwrap();
    fs::write(templates.join("notes.txt"), "ignored").unwrap();
    fs::write(templates.join(".hidden.md"), "ignored").unwrap();

    assert_eq!(service.list_templates().unwrap(), vec!["Cash", "Share"]);

    service.copy_template_to_working("Share", "Beta").unwrap();
    service.copy_template_to_working("Cash", "Alpha").unwrap();
    assert_eq!(service.list_working_drafts().unwrap(), vec!["Alpha", "Beta"]);
}

#[test]
fn created_lease_appears_in_year_listing() {
    let (service, _dir) = service();
    seed_draft(&service, "Draft1");

    let lease = service
        .create_completed_lease("Draft1", &sunny_acres())
        .unwrap();
    let files = service.list_files(2025).unwrap();

    assert_eq!(files.len(), 1);
    let info = &files[0];
    assert_eq!(info.file_name, lease.file_name);
    assert_eq!(info.file_path, lease.file_path);
    assert_eq!(info.year, 2025);

    let metadata = fs::metadata(&lease.file_path).unwrap();
    assert_eq!(info.file_size, metadata.len());
    let expected = metadata.created().or_else(|_| metadata.modified()).unwrap();
    assert_eq!(info.creation_date, chrono::DateTime::<chrono::Utc>::from(expected));
}

#[test]
fn years_are_listed_newest_first_ignoring_stray_entries() {
    let (service, _dir) = service();
    service.registry().ensure_year_dir(2024).unwrap();
    service.registry().ensure_year_dir(2025).unwrap();
    let completed = service.registry().path_for(DocumentTier::Completed);
    fs::create_dir(completed.join("archive")).unwrap();
    fs::write(completed.join("2023"), "a file, not a year").unwrap();
    fs::create_dir(completed.join("+2026")).unwrap();
    fs::create_dir(completed.join("-3")).unwrap();

    assert_eq!(service.list_years().unwrap(), vec![2025, 2024]);
}

#[test]
fn missing_year_lists_no_files() {
    let (service, _dir) = service();

    assert!(service.list_files(1999).unwrap().is_empty());
    assert!(service.list_years().unwrap().is_empty());
}

#[test]
fn year_manifest_lists_each_lease() {
    let (service, _dir) = fixed_suffix_service("D00D");
    seed_draft(&service, "Draft1");
    service
        .create_completed_lease("Draft1", &sunny_acres())
        .unwrap();
    service
        .create_completed_lease("Draft1", &sunny_acres())
        .unwrap();

    let mut buffer = Vec::new();
    let written = service.export_year_manifest(2025, &mut buffer).unwrap();
    let manifest = String::from_utf8(buffer).unwrap();

    assert_eq!(written, 2);
    let mut lines = manifest.lines();
    assert_eq!(lines.next(), Some("file_name,year,created_at,file_size"));
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|row| row.starts_with("SUNN2025V01D00D.md,2025,")));
    assert!(rows.iter().any(|row| row.starts_with("SUNN2025V02D00D.md,2025,")));
}

#[test]
fn hashing_a_file_is_stable() {
    let (service, _dir) = service();
    seed_draft(&service, "Draft1");
    let lease = service
        .create_completed_lease("Draft1", &sunny_acres())
        .unwrap();

    let first = service.hash_file(&lease.file_path).unwrap();
    let second = service.hash_file(&lease.file_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, lease.content_hash);
    assert_eq!(first.as_str().len(), 64);
}

#[test]
fn independent_roots_do_not_share_state() {
    let (first, _first_dir) = service();
    let (second, _second_dir) = service();
    seed_draft(&first, "Draft1");

    assert_eq!(first.list_working_drafts().unwrap(), vec!["Draft1"]);
    assert!(second.list_working_drafts().unwrap().is_empty());
}
