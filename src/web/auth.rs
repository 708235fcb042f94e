use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::web::{AppState, templates};

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_TTL_HOURS: i64 = 12;

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

pub async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Result<Html<String>, Redirect> {
    if session_is_valid(&state, &jar).await {
        return Err(Redirect::to("/admin"));
    }

    Ok(Html(templates::render_admin_login_page(None)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    if !verify_password(&form.password, state.admin_password_hash()) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Html(templates::render_admin_login_page(Some("Wrong password."))),
        ));
    }

    let session_token = Uuid::new_v4();
    let expires_at = Utc::now() + ChronoDuration::hours(SESSION_TTL_HOURS);

    if let Err(err) = sqlx::query("INSERT INTO admin_sessions (id, expires_at) VALUES ($1, $2)")
        .bind(session_token)
        .bind(expires_at)
        .execute(state.pool_ref())
        .await
    {
        error!(?err, "failed to create admin session");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(templates::render_admin_login_page(Some(
                "Server error, please try again.",
            ))),
        ));
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, session_token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::hours(SESSION_TTL_HOURS));

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to("/admin")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
                .bind(token)
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove admin session during logout");
            }
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/admin/login"))
}

/// Gate for admin routes: every request revalidates the cookie token against
/// the sessions table.
pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<(), Redirect> {
    if session_is_valid(state, jar).await {
        Ok(())
    } else {
        Err(Redirect::to("/admin/login"))
    }
}

async fn session_is_valid(state: &AppState, jar: &CookieJar) -> bool {
    let Some(token_cookie) = jar.get(SESSION_COOKIE) else {
        return false;
    };
    let Ok(token) = Uuid::parse_str(token_cookie.value()) else {
        return false;
    };

    match fetch_live_session(state.pool_ref(), token).await {
        Ok(valid) => valid,
        Err(err) => {
            error!(?err, "failed to validate admin session");
            false
        }
    }
}

async fn fetch_live_session(pool: &PgPool, token: Uuid) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM admin_sessions WHERE id = $1 AND expires_at > NOW())",
    )
    .bind(token)
    .fetch_one(pool)
    .await
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hash_password("fest-secret").unwrap();
        assert!(verify_password("fest-secret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hashes() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
