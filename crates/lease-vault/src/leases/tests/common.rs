use std::fs;
use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;

use crate::leases::naming::SuffixSource;
use crate::leases::{LeaseCreationData, LeaseDocumentService};

pub(super) const STANDARD_TEMPLATE: &str = "# Standard Cash Lease\n\
\n\
This lease between {{farmer_name}} and the owner of {{property_name}} covers the\n\
{{growing_year}} growing year ({{start_date}} to {{end_date}}).\n\
\n\
Rent: {{rent_amount}} paid {{rent_frequency}}. Reference {{lease_id}}.\n";

/// Always hands out the same suffix so collisions can be staged deterministically.
pub(super) struct FixedSuffix(pub(super) &'static str);

impl SuffixSource for FixedSuffix {
    fn next_suffix(&self) -> String {
        self.0.to_string()
    }
}

pub(super) fn service() -> (LeaseDocumentService, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let service = LeaseDocumentService::open(dir.path().join("Leases")).expect("service opens");
    (service, dir)
}

pub(super) fn fixed_suffix_service(suffix: &'static str) -> (LeaseDocumentService, TempDir) {
    let (service, dir) = service();
    (service.with_suffix_source(Arc::new(FixedSuffix(suffix))), dir)
}

/// Seed `StandardCashLease` and copy it into the working tier as `draft`.
pub(super) fn seed_draft(service: &LeaseDocumentService, draft: &str) {
    let template = service.registry().template_path("StandardCashLease");
    fs::write(template, STANDARD_TEMPLATE).expect("seed template");
    service
        .copy_template_to_working("StandardCashLease", draft)
        .expect("copy template");
}

pub(super) fn sunny_acres() -> LeaseCreationData {
    LeaseCreationData {
        property_name: Some("Sunny Acres".to_string()),
        farmer_name: Some("J. Smith".to_string()),
        ..LeaseCreationData::for_year(2025)
    }
}

pub(super) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
