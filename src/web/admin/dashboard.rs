use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::{
    export::MISSING_PLACEHOLDER,
    registrations::{self, RegistrationRow, StatusFilter, filter_registrations},
    web::{AppState, auth, escape_html, render_page},
};

#[derive(Default, Deserialize)]
pub struct DashboardQuery {
    /// Text filter over name, email and event.
    #[serde(default)]
    pub q: Option<String>,
    /// Status filter: all | verified | pending.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, Redirect> {
    auth::require_admin(&state, &jar).await?;

    let text = query.q.as_deref().unwrap_or("").to_string();
    let status = StatusFilter::from_param(query.status.as_deref());

    let mut flash = compose_flash_message(query.notice.as_deref(), query.error.as_deref());

    let rows = match registrations::fetch_all_registrations(state.pool_ref()).await {
        Ok(rows) => rows,
        Err(err) => {
            error!(?err, "failed to fetch registrations for dashboard");
            flash.push_str(
                r#"<div class="flash error">Could not load registrations. Please retry.</div>"#,
            );
            Vec::new()
        }
    };

    let filtered = filter_registrations(&rows, &text, status);

    Ok(Html(render_dashboard(&filtered, &text, status, &flash)))
}

/// Percent-encodes a query value for hrefs built into the page.
pub(super) fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Dashboard URL carrying the active filters plus an optional flash code.
pub(super) fn dashboard_url(
    text: &str,
    status: StatusFilter,
    notice: Option<&str>,
    error: Option<&str>,
) -> String {
    let mut url = format!(
        "/admin?q={}&status={}",
        encode_query_value(text),
        status.as_param()
    );
    if let Some(notice) = notice {
        url.push_str("&notice=");
        url.push_str(notice);
    }
    if let Some(error) = error {
        url.push_str("&error=");
        url.push_str(error);
    }
    url
}

fn compose_flash_message(notice: Option<&str>, error: Option<&str>) -> String {
    if let Some(notice) = notice {
        let message = match notice {
            "verified" => "Payment marked as verified.",
            "unverified" => "Payment marked as pending.",
            _ => "",
        };
        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "toggle_failed" => "Could not update the payment status. The displayed state is unchanged.",
            "toggle_missing" => "That registration no longer exists.",
            "fetch_failed" => "Could not load registrations. Please retry.",
            _ => "An unknown error occurred. Check the logs.",
        };
        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}

fn render_dashboard(
    filtered: &[&RegistrationRow],
    text: &str,
    status: StatusFilter,
    flash: &str,
) -> String {
    let status_options = [StatusFilter::All, StatusFilter::Verified, StatusFilter::Pending]
        .iter()
        .map(|option| {
            let selected = if *option == status { " selected" } else { "" };
            let label = match option {
                StatusFilter::All => "All",
                StatusFilter::Verified => "Verified",
                StatusFilter::Pending => "Pending",
            };
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = option.as_param(),
            )
        })
        .collect::<String>();

    let export_href = format!(
        "/admin/export.csv?q={}&status={}",
        encode_query_value(text),
        status.as_param()
    );

    let table = if filtered.is_empty() {
        r#"<p class="note" style="padding: 1.5rem; text-align: center;">No registrations found.</p>"#
            .to_string()
    } else {
        let rows_html = filtered
            .iter()
            .map(|row| render_row(row, text, status))
            .collect::<String>();
        format!(
            r#"<table>
                <thead>
                    <tr>
                        <th>Name</th><th>Email</th><th>Phone</th><th>Event</th>
                        <th>Txn ID</th><th>Screenshot</th><th>Verified</th><th>Registered At</th><th></th>
                    </tr>
                </thead>
                <tbody>
{rows_html}                </tbody>
            </table>"#,
        )
    };

    let body = format!(
        r#"        <div style="display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; margin-bottom: 1.5rem;">
            <h1 style="margin: 0; color: #0d9488;">Admin Dashboard</h1>
            <form class="logout-form" method="post" action="/admin/logout">
                <button type="submit" style="background: #64748b;">Logout</button>
            </form>
        </div>
        {flash}
        <section class="panel">
            <form method="get" action="/admin" style="display: flex; gap: 0.75rem; flex-wrap: wrap; align-items: flex-end;">
                <div style="flex: 2; min-width: 220px;">
                    <label for="q">Search by name, email or event</label>
                    <input id="q" name="q" value="{text}">
                </div>
                <div style="flex: 1; min-width: 140px;">
                    <label for="status">Status</label>
                    <select id="status" name="status">{status_options}</select>
                </div>
                <button type="submit">Apply</button>
                <a href="{export_href}" style="padding: 0.85rem 1.2rem; border-radius: 10px; background: #16a34a; color: #ffffff; text-decoration: none; font-weight: 600;">⬇ Export CSV</a>
            </form>
            {table}
        </section>
"#,
        flash = flash,
        text = escape_html(text),
        status_options = status_options,
        export_href = export_href,
        table = table,
    );

    render_page("Admin Dashboard — Cache2k25", &body)
}

fn render_row(row: &RegistrationRow, text: &str, status: StatusFilter) -> String {
    let screenshot_cell = match row.payment_screenshot.as_deref() {
        Some(url) => format!(
            r#"<a href="{url}" target="_blank">View</a>"#,
            url = escape_html(url)
        ),
        None => format!(r#"<span class="note">{MISSING_PLACEHOLDER}</span>"#),
    };

    let badge = if row.payment_verified {
        r#"<span class="badge verified">Verified</span>"#
    } else {
        r#"<span class="badge pending">Pending</span>"#
    };

    let (button_label, button_class) = if row.payment_verified {
        ("Mark pending", "toggle-button unverify")
    } else {
        ("Mark verified", "toggle-button")
    };

    format!(
        r#"                    <tr>
                        <td>{name}</td>
                        <td>{email}</td>
                        <td>{phone}</td>
                        <td>{event}</td>
                        <td>{transaction_id}</td>
                        <td>{screenshot_cell}</td>
                        <td>{badge}</td>
                        <td>{registered_at}</td>
                        <td>
                            <form method="post" action="/admin/verify">
                                <input type="hidden" name="id" value="{id}">
                                <input type="hidden" name="current" value="{current}">
                                <input type="hidden" name="q" value="{q}">
                                <input type="hidden" name="status" value="{status}">
                                <button type="submit" class="{button_class}">{button_label}</button>
                            </form>
                        </td>
                    </tr>
"#,
        name = escape_html(&row.name),
        email = escape_html(&row.email),
        phone = escape_html(&row.phone),
        event = escape_html(&row.event),
        transaction_id = escape_html(row.transaction_id.as_deref().unwrap_or(MISSING_PLACEHOLDER)),
        screenshot_cell = screenshot_cell,
        badge = badge,
        registered_at = crate::export::format_registered_at(row.created_at),
        id = row.id,
        current = row.payment_verified,
        q = escape_html(text),
        status = status.as_param(),
        button_class = button_class,
        button_label = button_label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrations::tests::sample_row;

    #[test]
    fn query_values_are_percent_encoded() {
        assert_eq!(encode_query_value("anna rao"), "anna%20rao");
        assert_eq!(encode_query_value("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query_value("plain-text_1.~"), "plain-text_1.~");
    }

    #[test]
    fn dashboard_url_carries_filters_and_flash() {
        assert_eq!(
            dashboard_url("ann", StatusFilter::Pending, Some("verified"), None),
            "/admin?q=ann&status=pending&notice=verified"
        );
        assert_eq!(
            dashboard_url("", StatusFilter::All, None, Some("toggle_failed")),
            "/admin?q=&status=all&error=toggle_failed"
        );
    }

    #[test]
    fn rows_render_placeholders_for_missing_optionals() {
        let mut row = sample_row("Anna", "anna@college.edu", "Tech Expo", false);
        row.transaction_id = None;
        row.payment_screenshot = None;

        let html = render_row(&row, "", StatusFilter::All);
        assert_eq!(html.matches(MISSING_PLACEHOLDER).count(), 2);
        assert!(html.contains("Pending"));
        assert!(html.contains(r#"name="current" value="false""#));
    }

    #[test]
    fn empty_filter_result_shows_empty_state() {
        let page = render_dashboard(&[], "ann", StatusFilter::Verified, "");
        assert!(page.contains("No registrations found."));
        assert!(page.contains("/admin/export.csv?q=ann&status=verified"));
    }

    #[test]
    fn flash_codes_map_to_messages() {
        assert!(compose_flash_message(Some("verified"), None).contains("verified"));
        assert!(compose_flash_message(None, Some("toggle_failed")).contains("unchanged"));
        assert!(compose_flash_message(None, None).is_empty());
    }
}
