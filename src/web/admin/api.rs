use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::{
    registrations::{self, RegistrationRow, StatusFilter, filter_registrations},
    web::{AppState, auth},
};

use super::dashboard::DashboardQuery;

#[derive(Serialize)]
pub(crate) struct RegistrationItem {
    id: String,
    name: String,
    email: String,
    phone: String,
    event: String,
    transaction_id: Option<String>,
    payment_screenshot: Option<String>,
    payment_verified: bool,
    created_at: String,
}

#[derive(Serialize)]
pub(crate) struct RegistrationListing {
    registrations: Vec<RegistrationItem>,
    total: usize,
    generated_at: String,
}

#[derive(Serialize)]
pub(crate) struct ApiError {
    message: String,
}

/// JSON listing of the filtered view, for the dashboard's refresh-on-demand.
pub async fn list_registrations(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<RegistrationListing>, (StatusCode, Json<ApiError>)> {
    if auth::require_admin(&state, &jar).await.is_err() {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Login required."));
    }

    let text = query.q.as_deref().unwrap_or("");
    let status = StatusFilter::from_param(query.status.as_deref());

    let rows = registrations::fetch_all_registrations(state.pool_ref())
        .await
        .map_err(|err| {
            error!(?err, "failed to fetch registrations for api listing");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not load registrations.",
            )
        })?;

    let total = rows.len();
    let registrations = filter_registrations(&rows, text, status)
        .into_iter()
        .map(to_item)
        .collect();

    Ok(Json(RegistrationListing {
        registrations,
        total,
        generated_at: Utc::now().to_rfc3339(),
    }))
}

fn to_item(row: &RegistrationRow) -> RegistrationItem {
    RegistrationItem {
        id: row.id.to_string(),
        name: row.name.clone(),
        email: row.email.clone(),
        phone: row.phone.clone(),
        event: row.event.clone(),
        transaction_id: row.transaction_id.clone(),
        payment_screenshot: row.payment_screenshot.clone(),
        payment_verified: row.payment_verified,
        created_at: row.created_at.to_rfc3339(),
    }
}

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<ApiError>) {
    (
        status,
        Json(ApiError {
            message: message.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrations::tests::sample_row;

    #[test]
    fn items_serialize_with_rfc3339_timestamps() {
        let row = sample_row("Anna", "anna@college.edu", "Tech Expo", true);
        let value = serde_json::to_value(to_item(&row)).unwrap();

        assert_eq!(value["name"], "Anna");
        assert_eq!(value["payment_verified"], true);
        assert_eq!(value["payment_screenshot"], serde_json::Value::Null);
        assert_eq!(value["created_at"], "2025-02-14T10:30:00+00:00");
    }
}
