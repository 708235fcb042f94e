//! Registration records: the one persisted entity, plus the in-memory
//! filtering the admin dashboard applies over the fetched set.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Clone, Debug, FromRow)]
pub struct RegistrationRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event: String,
    pub transaction_id: Option<String>,
    pub payment_screenshot: Option<String>,
    pub payment_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields collected from the registration form. `payment_screenshot` is set
/// only after the evidence upload has succeeded.
#[derive(Clone, Debug)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event: String,
    pub transaction_id: String,
    pub payment_screenshot: Option<String>,
}

/// Inserts a registration. `id` and `created_at` are assigned by the store.
pub async fn insert_registration(
    pool: &PgPool,
    new: &NewRegistration,
) -> sqlx::Result<RegistrationRow> {
    sqlx::query_as::<_, RegistrationRow>(
        "INSERT INTO registrations (name, email, phone, event, transaction_id, payment_screenshot)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, name, email, phone, event, transaction_id, payment_screenshot, payment_verified, created_at",
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.event)
    .bind(&new.transaction_id)
    .bind(&new.payment_screenshot)
    .fetch_one(pool)
    .await
}

/// Fetches every registration, newest first. The full set is held in memory;
/// filtering happens over this set, never via a re-query.
pub async fn fetch_all_registrations(pool: &PgPool) -> sqlx::Result<Vec<RegistrationRow>> {
    sqlx::query_as::<_, RegistrationRow>(
        "SELECT id, name, email, phone, event, transaction_id, payment_screenshot, payment_verified, created_at
         FROM registrations ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Flips the verification flag relative to its last-known state. Returns
/// false when no row matched, which callers must surface as a failure rather
/// than render a state the store never confirmed.
pub async fn set_payment_verified(
    pool: &PgPool,
    id: Uuid,
    verified: bool,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE registrations SET payment_verified = $2 WHERE id = $1")
        .bind(id)
        .bind(verified)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Verified,
    Pending,
}

impl StatusFilter {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("verified") => StatusFilter::Verified,
            Some("pending") => StatusFilter::Pending,
            _ => StatusFilter::All,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Verified => "verified",
            StatusFilter::Pending => "pending",
        }
    }

    fn matches(self, row: &RegistrationRow) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Verified => row.payment_verified,
            StatusFilter::Pending => !row.payment_verified,
        }
    }
}

/// Case-insensitive substring match over name, email and event, space-joined.
fn matches_text(row: &RegistrationRow, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack = format!("{} {} {}", row.name, row.email, row.event).to_lowercase();
    haystack.contains(&needle.to_lowercase())
}

/// Applies both filters conjunctively, preserving the fetched order.
pub fn filter_registrations<'a>(
    rows: &'a [RegistrationRow],
    text: &str,
    status: StatusFilter,
) -> Vec<&'a RegistrationRow> {
    rows.iter()
        .filter(|row| matches_text(row, text.trim()) && status.matches(row))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::TimeZone;

    use super::*;

    pub(crate) fn sample_row(name: &str, email: &str, event: &str, verified: bool) -> RegistrationRow {
        RegistrationRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: "9876543210".to_string(),
            event: event.to_string(),
            transaction_id: Some("TXN123".to_string()),
            payment_screenshot: None,
            payment_verified: verified,
            created_at: Utc.with_ymd_and_hms(2025, 2, 14, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn text_filter_is_case_insensitive_across_fields() {
        let rows = vec![
            sample_row("Anna", "anna@college.edu", "Tech Expo", false),
            sample_row("Bob", "bob@college.edu", "Live Drawing", false),
        ];

        assert_eq!(filter_registrations(&rows, "ANNA", StatusFilter::All).len(), 1);
        assert_eq!(filter_registrations(&rows, "college.edu", StatusFilter::All).len(), 2);
        assert_eq!(filter_registrations(&rows, "expo", StatusFilter::All).len(), 1);
        assert_eq!(filter_registrations(&rows, "cricket", StatusFilter::All).len(), 0);
    }

    #[test]
    fn empty_text_matches_everything() {
        let rows = vec![sample_row("Anna", "anna@college.edu", "Tech Expo", true)];
        assert_eq!(filter_registrations(&rows, "", StatusFilter::All).len(), 1);
        assert_eq!(filter_registrations(&rows, "   ", StatusFilter::All).len(), 1);
    }

    #[test]
    fn status_filter_splits_verified_and_pending() {
        let rows = vec![
            sample_row("Anna", "anna@college.edu", "Tech Expo", true),
            sample_row("Bob", "bob@college.edu", "Tech Expo", false),
        ];

        let verified = filter_registrations(&rows, "", StatusFilter::Verified);
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].name, "Anna");

        let pending = filter_registrations(&rows, "", StatusFilter::Pending);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Bob");
    }

    #[test]
    fn filters_apply_conjunctively() {
        let rows = vec![
            sample_row("Anna", "anna@college.edu", "Tech Expo", true),
            sample_row("Anna", "anna2@college.edu", "Tech Expo", false),
            sample_row("Bob", "bob@college.edu", "Tech Expo", true),
        ];

        let filtered = filter_registrations(&rows, "ann", StatusFilter::Verified);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].email, "anna@college.edu");
    }

    #[test]
    fn filtering_preserves_fetched_order() {
        let mut first = sample_row("Anna", "anna@college.edu", "Tech Expo", false);
        first.created_at = Utc.with_ymd_and_hms(2025, 2, 15, 9, 0, 0).unwrap();
        let mut second = sample_row("Annette", "annette@college.edu", "Tech Expo", false);
        second.created_at = Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap();

        // Rows arrive from the store newest-first; the filter must not reorder.
        let rows = vec![first, second];
        let filtered = filter_registrations(&rows, "ann", StatusFilter::All);
        assert_eq!(filtered.len(), 2);
        assert!(filtered[0].created_at > filtered[1].created_at);
    }

    #[test]
    fn status_params_round_trip() {
        assert_eq!(StatusFilter::from_param(Some("verified")), StatusFilter::Verified);
        assert_eq!(StatusFilter::from_param(Some("pending")), StatusFilter::Pending);
        assert_eq!(StatusFilter::from_param(Some("all")), StatusFilter::All);
        assert_eq!(StatusFilter::from_param(Some("bogus")), StatusFilter::All);
        assert_eq!(StatusFilter::from_param(None), StatusFilter::All);
        for status in [StatusFilter::All, StatusFilter::Verified, StatusFilter::Pending] {
            assert_eq!(StatusFilter::from_param(Some(status.as_param())), status);
        }
    }
}
