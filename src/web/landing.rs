use axum::response::Html;

use crate::{catalog, web::render_page};

pub async fn landing_page() -> Html<String> {
    let event_count = catalog::events().len();

    let body = format!(
        r#"        <section class="panel" style="text-align: center; padding: 3rem 2rem;">
            <h1 style="margin-top: 0; font-size: 2.4rem; color: #0d9488;">Cache2k25</h1>
            <p class="note" style="max-width: 640px; margin: 0 auto 1.5rem;">
                The annual tech fest of the Department of Computer Applications.
                {event_count} events, one unforgettable week — from esports showdowns
                to coding challenges and everything in between.
            </p>
            <p>
                <a class="register-link" style="display: inline-block; padding: 0.75rem 1.5rem; border-radius: 10px; background: #4f46e5; color: #ffffff; text-decoration: none; font-weight: 600; margin-right: 0.75rem;" href="/events">Browse Events</a>
                <a style="display: inline-block; padding: 0.75rem 1.5rem; border-radius: 10px; background: #0d9488; color: #ffffff; text-decoration: none; font-weight: 600;" href="/register">Register Now</a>
            </p>
        </section>
"#,
        event_count = event_count,
    );

    Html(render_page("Cache2k25 — College Tech Fest", &body))
}
