//! Pure text assembly of a final lease from a draft and [`LeaseCreationData`].

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::domain::{LeaseCreationData, LeaseError};

const NOT_SPECIFIED: &str = "Not specified";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Placeholders recognized in templates, in documentation order.
pub const PLACEHOLDERS: [&str; 9] = [
    "lease_id",
    "property_name",
    "farmer_name",
    "growing_year",
    "lease_type",
    "start_date",
    "end_date",
    "rent_amount",
    "rent_frequency",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LeaseComposer;

impl LeaseComposer {
    /// Inject the metadata header after the first `# ` heading and fill every known
    /// placeholder. Values are inserted once; placeholder text inside a value is not expanded.
    pub fn compose(
        &self,
        template: &str,
        data: &LeaseCreationData,
        created_at: DateTime<Utc>,
    ) -> Result<String, LeaseError> {
        let split = heading_end(template).ok_or_else(|| LeaseError::InvalidTemplate {
            reason: "no top-level '# ' heading to anchor the lease header".to_string(),
        })?;
        let (head, body) = template.split_at(split);

        let mut output = String::with_capacity(template.len() + 256);
        output.push_str(&substitute(head, data));
        if !head.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&render_header(data, created_at));
        output.push_str(&substitute(body, data));
        Ok(output)
    }
}

/// Byte offset just past the first top-level heading line (including its newline).
fn heading_end(template: &str) -> Option<usize> {
    let mut offset = 0;
    for line in template.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content == "#" || content.starts_with("# ") {
            return Some(offset + line.len());
        }
        offset += line.len();
    }
    None
}

fn render_header(data: &LeaseCreationData, created_at: DateTime<Utc>) -> String {
    let mut header = String::new();
    let _ = writeln!(header);
    let _ = writeln!(header, "## Lease Information");
    let _ = writeln!(header);
    let _ = writeln!(header, "- **Lease ID:** {}", or_unspecified(&data.lease_id));
    let _ = writeln!(header, "- **Property:** {}", or_unspecified(&data.property_name));
    let _ = writeln!(header, "- **Farmer:** {}", or_unspecified(&data.farmer_name));
    let _ = writeln!(
        header,
        "- **Created:** {}",
        created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(header, "- **Growing Year:** {}", data.growing_year);
    let _ = writeln!(header);
    let _ = writeln!(header, "---");
    let _ = writeln!(header);
    header
}

fn or_unspecified(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(NOT_SPECIFIED)
}

fn placeholder_value(token: &str, data: &LeaseCreationData) -> Option<String> {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let value = match token {
        "lease_id" => text(&data.lease_id),
        "property_name" => text(&data.property_name),
        "farmer_name" => text(&data.farmer_name),
        "growing_year" => data.growing_year.to_string(),
        "lease_type" => text(&data.lease_type),
        "start_date" => data
            .start_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        "end_date" => data
            .end_date
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        "rent_amount" => data
            .rent_amount
            .map(|amount| amount.to_string())
            .unwrap_or_default(),
        "rent_frequency" => text(&data.rent_frequency),
        _ => return None,
    };
    Some(value)
}

/// Single left-to-right pass; unknown `{{tokens}}` are copied through untouched.
fn substitute(text: &str, data: &LeaseCreationData) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            output.push_str(&rest[open..]);
            return output;
        };

        let token = &after_open[..close];
        match placeholder_value(token, data) {
            Some(value) => {
                output.push_str(&value);
                rest = &after_open[close + 2..];
            }
            None => {
                // Keep the braces and rescan from just after them, so `{{{{lease_id}}` still
                // resolves the inner token.
                output.push_str("{{");
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal::Decimal;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 9, 30, 0).unwrap()
    }

    fn sunny_acres() -> LeaseCreationData {
        LeaseCreationData {
            lease_id: Some("L-100".to_string()),
            property_name: Some("Sunny Acres".to_string()),
            farmer_name: Some("J. Smith".to_string()),
            growing_year: 2025,
            lease_type: Some("Cash Rent".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 28),
            rent_amount: Some(Decimal::new(25000, 2)),
            rent_frequency: Some("Annual".to_string()),
        }
    }

    #[test]
    fn header_follows_first_heading() {
        let template = "# Lease\nBody for {{property_name}}.\n";
        let composed = LeaseComposer
            .compose(template, &sunny_acres(), created_at())
            .unwrap();

        let expected = "# Lease\n\
\n\
## Lease Information\n\
\n\
- **Lease ID:** L-100\n\
- **Property:** Sunny Acres\n\
- **Farmer:** J. Smith\n\
- **Created:** 2025-02-14 09:30:00 UTC\n\
- **Growing Year:** 2025\n\
\n\
---\n\
\n\
Body for Sunny Acres.\n";
        assert_eq!(composed, expected);
    }

    #[test]
    fn every_placeholder_is_filled() {
        let template = format!(
            "# Lease\n{}\n",
            PLACEHOLDERS
                .iter()
                .map(|token| format!("{{{{{token}}}}}"))
                .collect::<Vec<_>>()
                .join("|")
        );
        let composed = LeaseComposer
            .compose(&template, &sunny_acres(), created_at())
            .unwrap();

        assert!(composed.ends_with(
            "L-100|Sunny Acres|J. Smith|2025|Cash Rent|2025-03-01|2026-02-28|250.00|Annual\n"
        ));
        assert!(!composed.contains("{{"));
    }

    #[test]
    fn absent_fields_become_empty_in_body() {
        let data = LeaseCreationData::for_year(2024);
        let template = "# Lease\nTenant: [{{farmer_name}}] Rent: [{{rent_amount}}]\n";
        let composed = LeaseComposer.compose(template, &data, created_at()).unwrap();

        assert!(composed.contains("Tenant: [] Rent: []"));
        assert!(composed.contains("- **Farmer:** Not specified"));
    }

    #[test]
    fn unknown_tokens_survive_verbatim() {
        let template = "# Lease\n{{witness_name}} and {{property_name}} and {{unterminated\n";
        let composed = LeaseComposer
            .compose(template, &sunny_acres(), created_at())
            .unwrap();

        assert!(composed.contains("{{witness_name}} and Sunny Acres and {{unterminated\n"));
    }

    #[test]
    fn values_are_not_expanded_twice() {
        let mut data = sunny_acres();
        data.property_name = Some("{{lease_id}} Farm".to_string());
        let composed = LeaseComposer
            .compose("# Lease\n{{property_name}}\n", &data, created_at())
            .unwrap();

        assert!(composed.ends_with("{{lease_id}} Farm\n"));
    }

    #[test]
    fn subheadings_do_not_anchor_the_header() {
        let template = "## Schedule\nintro\n# Farm Lease\nterms\n";
        let composed = LeaseComposer
            .compose(template, &sunny_acres(), created_at())
            .unwrap();

        let header_at = composed.find("## Lease Information").unwrap();
        assert!(header_at > composed.find("# Farm Lease").unwrap());
        assert!(composed.starts_with("## Schedule\nintro\n# Farm Lease\n\n"));
    }

    #[test]
    fn heading_on_last_line_gets_a_newline() {
        let composed = LeaseComposer
            .compose("# Lease", &sunny_acres(), created_at())
            .unwrap();
        assert!(composed.starts_with("# Lease\n\n## Lease Information\n"));
    }

    #[test]
    fn missing_heading_is_invalid_template() {
        let error = LeaseComposer
            .compose("No heading here\n#hashtag\n", &sunny_acres(), created_at())
            .expect_err("no anchor");
        assert!(matches!(error, LeaseError::InvalidTemplate { .. }));
    }

    #[test]
    fn composition_is_deterministic_for_fixed_timestamp() {
        let template = "# Lease\n{{farmer_name}} farms {{property_name}}\n";
        let first = LeaseComposer
            .compose(template, &sunny_acres(), created_at())
            .unwrap();
        let second = LeaseComposer
            .compose(template, &sunny_acres(), created_at())
            .unwrap();
        assert_eq!(first, second);
    }
}
