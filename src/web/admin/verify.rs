use axum::{
    extract::{Form, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    registrations::{self, StatusFilter},
    web::{AppState, auth},
};

use super::dashboard::dashboard_url;

#[derive(Deserialize)]
pub struct ToggleForm {
    pub id: Uuid,
    /// Last-known verification state as displayed to the admin.
    pub current: bool,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Flips the verification flag, redirecting back to the dashboard only after
/// the store confirms the update; a failure leaves the displayed state
/// untouched and surfaces an error flash.
pub async fn toggle_verification(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ToggleForm>,
) -> Result<Redirect, Redirect> {
    auth::require_admin(&state, &jar).await?;

    let text = form.q.as_deref().unwrap_or("");
    let status = StatusFilter::from_param(form.status.as_deref());
    let new_state = !form.current;

    match registrations::set_payment_verified(state.pool_ref(), form.id, new_state).await {
        Ok(true) => {
            let notice = if new_state { "verified" } else { "unverified" };
            Ok(Redirect::to(&dashboard_url(text, status, Some(notice), None)))
        }
        Ok(false) => Ok(Redirect::to(&dashboard_url(
            text,
            status,
            None,
            Some("toggle_missing"),
        ))),
        Err(err) => {
            error!(?err, id = %form.id, "failed to toggle payment verification");
            Ok(Redirect::to(&dashboard_url(
                text,
                status,
                None,
                Some("toggle_failed"),
            )))
        }
    }
}
