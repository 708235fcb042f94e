use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, events, landing, register, storage};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

/// Room for the 8 MiB evidence cap plus the text fields and multipart framing.
const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/events", get(events::events_page))
        .route(
            "/register",
            get(register::register_page)
                .post(register::submit_registration)
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .route("/uploads/*key", get(storage::serve_evidence))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route(
            "/admin/login",
            get(auth::login_page).post(auth::process_login),
        )
        .route("/admin/logout", post(auth::logout))
        .route("/admin", get(admin::dashboard))
        .route("/admin/verify", post(admin::toggle_verification))
        .route("/admin/export.csv", get(admin::export_csv))
        .route("/admin/api/registrations", get(admin::list_registrations))
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
