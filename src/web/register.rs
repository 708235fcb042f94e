//! Registration submission: form render, multipart parsing, and the strict
//! upload-then-insert sequencing for payment evidence.

use axum::{
    extract::{Multipart, Query, State},
    response::Html,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};

use crate::{
    catalog,
    registrations::{self, NewRegistration},
    web::{AppState, escape_html, render_page, storage},
};

const EVIDENCE_FIELD: &str = "payment_screenshot";
const ALLOWED_EVIDENCE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "heic"];
const MAX_EVIDENCE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Default, Deserialize)]
pub struct RegisterQuery {
    pub event: Option<String>,
}

/// Text fields of the form, kept around so a failed submission re-renders
/// with everything the applicant already typed.
#[derive(Clone, Debug, Default)]
struct FormValues {
    name: String,
    email: String,
    phone: String,
    event: String,
    transaction_id: String,
}

struct EvidenceFile {
    original_name: String,
    bytes: Vec<u8>,
}

struct Submission {
    values: FormValues,
    evidence: Option<EvidenceFile>,
}

struct SubmissionError {
    message: String,
}

impl SubmissionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub async fn register_page(Query(query): Query<RegisterQuery>) -> Html<String> {
    let values = FormValues {
        event: query
            .event
            .as_deref()
            .and_then(catalog::resolve_event_param)
            .unwrap_or_default()
            .to_string(),
        ..FormValues::default()
    };

    Html(render_form(&values, None))
}

pub async fn submit_registration(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Html<String> {
    let submission = match parse_submission(multipart).await {
        Ok(submission) => submission,
        Err(err) => {
            return Html(render_form(&FormValues::default(), Some(&err.message)));
        }
    };

    let values = &submission.values;
    if let Err(err) = validate_required(values) {
        return Html(render_form(values, Some(&err.message)));
    }

    // Per the data contract, event membership in the catalog is not enforced
    // server-side; an unexpected title is only worth a log line.
    if catalog::find_by_title(&values.event).is_none() {
        warn!(event = %values.event, "registration for event not in catalog");
    }

    // The insert must only happen after a successful upload so a failed
    // upload can never leave a record without its evidence link.
    let payment_screenshot = match &submission.evidence {
        Some(file) => {
            let key = storage::evidence_key(
                &values.event,
                &values.name,
                Utc::now().timestamp_millis(),
                &file.original_name,
            );
            if let Err(err) = storage::store_evidence(state.storage_root(), &key, &file.bytes).await
            {
                error!(?err, %key, "failed to store payment evidence");
                return Html(render_form(
                    values,
                    Some("Could not upload your payment screenshot. Please try again."),
                ));
            }
            Some(storage::public_url(state.public_base_url(), &key))
        }
        None => None,
    };

    let new = NewRegistration {
        name: values.name.trim().to_string(),
        email: values.email.trim().to_string(),
        phone: values.phone.trim().to_string(),
        event: values.event.clone(),
        transaction_id: values.transaction_id.trim().to_string(),
        payment_screenshot,
    };

    match registrations::insert_registration(state.pool_ref(), &new).await {
        Ok(row) => {
            tracing::info!(id = %row.id, event = %row.event, "registration recorded");
            Html(render_success_page())
        }
        Err(err) => {
            error!(?err, "failed to insert registration");
            Html(render_form(
                values,
                Some("Could not save your registration. Please try again."),
            ))
        }
    }
}

async fn parse_submission(mut multipart: Multipart) -> Result<Submission, SubmissionError> {
    let mut values = FormValues::default();
    let mut evidence = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| SubmissionError::new(format!("Could not read the form: {err}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field.file_name().is_none() {
            let value = field.text().await.map_err(|err| {
                SubmissionError::new(format!("Could not read field `{field_name}`: {err}"))
            })?;
            match field_name.as_str() {
                "name" => values.name = value,
                "email" => values.email = value,
                "phone" => values.phone = value,
                "event" => values.event = value,
                "transaction_id" => values.transaction_id = value,
                _ => {}
            }
            continue;
        }

        if field_name != EVIDENCE_FIELD {
            return Err(SubmissionError::new(format!(
                "Unexpected file field `{field_name}`."
            )));
        }

        let original_name = field.file_name().unwrap_or("").to_string();
        // Browsers submit an empty file part when no screenshot was chosen.
        if original_name.is_empty() {
            continue;
        }

        let extension = std::path::Path::new(&original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EVIDENCE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(SubmissionError::new(
                "Payment screenshots must be an image (jpg, jpeg, png, webp, gif or heic).",
            ));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| SubmissionError::new(format!("Could not read the upload: {err}")))?
        {
            if bytes.len() + chunk.len() > MAX_EVIDENCE_BYTES {
                return Err(SubmissionError::new(
                    "The payment screenshot is too large (8 MB maximum).",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        if !bytes.is_empty() {
            evidence = Some(EvidenceFile {
                original_name,
                bytes,
            });
        }
    }

    Ok(Submission { values, evidence })
}

fn validate_required(values: &FormValues) -> Result<(), SubmissionError> {
    let required = [
        (values.name.trim(), "your full name"),
        (values.email.trim(), "your email"),
        (values.phone.trim(), "your phone number"),
        (values.event.trim(), "an event"),
        (values.transaction_id.trim(), "the UPI transaction ID"),
    ];

    for (value, label) in required {
        if value.is_empty() {
            return Err(SubmissionError::new(format!("Please provide {label}.")));
        }
    }

    Ok(())
}

fn render_form(values: &FormValues, error: Option<&str>) -> String {
    let flash = error
        .map(|message| format!(r#"<div class="flash error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let event_options = catalog::events()
        .iter()
        .map(|event| {
            let selected = if event.title == values.event {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{title}"{selected}>{title} (₹{fee})</option>"#,
                title = escape_html(event.title),
                fee = event.fee,
                selected = selected,
            )
        })
        .collect::<String>();

    let body = format!(
        r#"        <section class="panel" style="max-width: 560px; margin: 0 auto;">
            <h2>Register for Cache2k25</h2>
            <p class="note">Fill in your details below to register for your favorite event. Upload your UPI transaction screenshot to confirm payment.</p>
            {flash}
            <form method="post" action="/register" enctype="multipart/form-data">
                <label for="name">Full Name</label>
                <input id="name" name="name" value="{name}" required>
                <label for="email">Email</label>
                <input id="email" type="email" name="email" value="{email}" required>
                <label for="phone">Phone Number</label>
                <input id="phone" name="phone" value="{phone}" required>
                <label for="event">Event</label>
                <select id="event" name="event" required>
                    <option value="">Select Event</option>
                    {event_options}
                </select>
                <label for="transaction_id">UPI Transaction ID</label>
                <input id="transaction_id" name="transaction_id" value="{transaction_id}" required>
                <label for="payment_screenshot">Payment Screenshot (optional)</label>
                <input id="payment_screenshot" type="file" name="payment_screenshot" accept="image/*">
                <button type="submit" style="margin-top: 1.5rem; width: 100%;">Register</button>
            </form>
        </section>
"#,
        flash = flash,
        name = escape_html(&values.name),
        email = escape_html(&values.email),
        phone = escape_html(&values.phone),
        transaction_id = escape_html(&values.transaction_id),
        event_options = event_options,
    );

    render_page("Register — Cache2k25", &body)
}

fn render_success_page() -> String {
    let body = r#"        <section class="panel" style="max-width: 560px; margin: 3rem auto; text-align: center;">
            <h2>Registration Successful 🎉</h2>
            <p class="note">Your registration has been received. We'll verify your payment and confirm soon.</p>
            <p><a href="/events">Back to events</a></p>
        </section>
"#;

    render_page("Registered — Cache2k25", body)
}
