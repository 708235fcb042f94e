//! CSV export of the admin dashboard's currently filtered view.

use chrono::{DateTime, Utc};

use crate::registrations::RegistrationRow;

/// Marker rendered for absent optional fields so an empty cell can never be
/// mistaken for a failed upload.
pub const MISSING_PLACEHOLDER: &str = "N/A";

const COLUMNS: &[&str] = &[
    "Name",
    "Email",
    "Phone",
    "Event",
    "Transaction ID",
    "Payment Screenshot",
    "Payment Verified",
    "Registered At",
];

/// Serializes the filtered rows into CSV with the fixed column order.
pub fn registrations_csv(rows: &[&RegistrationRow]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push_str("\r\n");

    for row in rows {
        let fields = [
            row.name.as_str(),
            row.email.as_str(),
            row.phone.as_str(),
            row.event.as_str(),
            row.transaction_id.as_deref().unwrap_or(MISSING_PLACEHOLDER),
            row.payment_screenshot
                .as_deref()
                .unwrap_or(MISSING_PLACEHOLDER),
            if row.payment_verified { "Yes" } else { "No" },
        ];
        let registered_at = format_registered_at(row.created_at);

        let record = fields
            .iter()
            .map(|field| csv_quote(field))
            .chain(std::iter::once(csv_quote(&registered_at)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&record);
        out.push_str("\r\n");
    }

    out
}

pub fn format_registered_at(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Download name carrying the export timestamp. Dashes replace colons in the
/// time part so the name stays valid on every filesystem.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("registrations_{}.csv", now.format("%Y-%m-%dT%H-%M-%SZ"))
}

fn csv_quote(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::registrations::{StatusFilter, filter_registrations, tests::sample_row};

    #[test]
    fn header_row_has_fixed_column_order() {
        let csv = registrations_csv(&[]);
        assert_eq!(
            csv,
            "Name,Email,Phone,Event,Transaction ID,Payment Screenshot,Payment Verified,Registered At\r\n"
        );
    }

    #[test]
    fn missing_optionals_render_consistent_placeholders() {
        let mut row = sample_row("Anna", "anna@college.edu", "Tech Expo", false);
        row.transaction_id = None;
        row.payment_screenshot = None;

        let csv = registrations_csv(&[&row]);
        let record = csv.lines().nth(1).unwrap();
        let cells: Vec<&str> = record.split(',').collect();
        assert_eq!(cells[4], MISSING_PLACEHOLDER);
        assert_eq!(cells[5], MISSING_PLACEHOLDER);
        assert_eq!(cells[6], "No");
    }

    #[test]
    fn verified_flag_renders_yes_no() {
        let verified = sample_row("Anna", "anna@college.edu", "Tech Expo", true);
        let pending = sample_row("Bob", "bob@college.edu", "Tech Expo", false);

        let csv = registrations_csv(&[&verified, &pending]);
        let mut lines = csv.lines().skip(1);
        assert!(lines.next().unwrap().contains(",Yes,"));
        assert!(lines.next().unwrap().contains(",No,"));
    }

    #[test]
    fn fields_with_commas_and_quotes_are_quoted() {
        let mut row = sample_row("Anna", "anna@college.edu", "Tech Expo", false);
        row.name = "Rao, Anna \"Ann\"".to_string();

        let csv = registrations_csv(&[&row]);
        let record = csv.lines().nth(1).unwrap();
        assert!(record.starts_with("\"Rao, Anna \"\"Ann\"\"\","));
    }

    #[test]
    fn export_respects_the_active_filter() {
        let rows = vec![
            sample_row("Anna", "anna@college.edu", "Tech Expo", true),
            sample_row("Bob", "bob@college.edu", "Tech Expo", false),
        ];

        let pending = filter_registrations(&rows, "", StatusFilter::Pending);
        let csv = registrations_csv(&pending);
        assert!(!csv.contains("Anna"));
        assert!(csv.contains("Bob"));
    }

    #[test]
    fn registered_at_formatting_is_stable() {
        let ts = Utc.with_ymd_and_hms(2025, 2, 14, 10, 30, 0).unwrap();
        assert_eq!(format_registered_at(ts), "2025-02-14 10:30:00 UTC");
    }

    #[test]
    fn export_filename_is_filesystem_safe() {
        let ts = Utc.with_ymd_and_hms(2025, 2, 14, 10, 30, 0).unwrap();
        let name = export_filename(ts);
        assert_eq!(name, "registrations_2025-02-14T10-30-00Z.csv");
        assert!(!name.contains(':'));
    }
}
