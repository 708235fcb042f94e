use axum::response::Html;

use crate::{
    catalog::{self, EventCategory},
    web::{escape_html, render_page},
};

pub async fn events_page() -> Html<String> {
    let mut body = String::from(
        r#"        <h1 style="text-align: center; color: #4f46e5;">Events at Cache2k25</h1>
"#,
    );

    for category in [EventCategory::NonTechnical, EventCategory::Technical] {
        body.push_str(&format!(
            "        <h2 style=\"color: #6366f1;\">{}</h2>\n",
            category.heading()
        ));
        body.push_str("        <div class=\"cards-grid\">\n");
        for event in catalog::events_in(category) {
            body.push_str(&render_event_card(event));
        }
        body.push_str("        </div>\n");
    }

    Html(render_page("Events — Cache2k25", &body))
}

fn render_event_card(event: &catalog::CatalogEvent) -> String {
    format!(
        r#"            <div class="event-card">
                <h3>{title}</h3>
                <p class="note">{description}</p>
                <span class="fee">₹{fee}</span>
                <a class="register-link" href="/register?event={slug}">Register</a>
            </div>
"#,
        title = escape_html(event.title),
        description = escape_html(event.description),
        fee = event.fee,
        slug = event.slug,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_link_by_slug() {
        let card = render_event_card(catalog::find_by_slug("tech-expo").unwrap());
        assert!(card.contains(r#"href="/register?event=tech-expo""#));
        assert!(card.contains("₹100"));
    }
}
