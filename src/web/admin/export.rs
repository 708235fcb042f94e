use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::error;

use crate::{
    export::{export_filename, registrations_csv},
    registrations::{self, StatusFilter, filter_registrations},
    web::{AppState, auth},
};

use super::dashboard::{DashboardQuery, dashboard_url};

/// Downloads the currently filtered view as CSV. The filter parameters come
/// from the dashboard link, so the export always matches what the admin is
/// looking at.
pub async fn export_csv(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Redirect> {
    auth::require_admin(&state, &jar).await?;

    let text = query.q.as_deref().unwrap_or("");
    let status = StatusFilter::from_param(query.status.as_deref());

    let rows = match registrations::fetch_all_registrations(state.pool_ref()).await {
        Ok(rows) => rows,
        Err(err) => {
            error!(?err, "failed to fetch registrations for export");
            return Err(Redirect::to(&dashboard_url(
                text,
                status,
                None,
                Some("fetch_failed"),
            )));
        }
    };

    let filtered = filter_registrations(&rows, text, status);
    let csv = registrations_csv(&filtered);
    let filename = export_filename(Utc::now());

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let disposition = format!("attachment; filename=\"{filename}\"");
    let disposition = HeaderValue::from_str(&disposition).map_err(|_| {
        error!(%filename, "export filename produced an invalid header");
        Redirect::to(&dashboard_url(text, status, None, Some("fetch_failed")))
    })?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, csv).into_response())
}
