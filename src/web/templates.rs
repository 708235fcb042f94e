use chrono::{Datelike, Utc};

const SITE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; min-height: 100vh; display: flex; flex-direction: column; }
        header.site-nav { background: #ffffff; border-bottom: 1px solid #e2e8f0; padding: 1rem 1.5rem; display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 0.75rem; }
        .brand { font-size: 1.35rem; font-weight: 800; color: #0d9488; text-decoration: none; }
        nav.links { display: flex; gap: 1rem; flex-wrap: wrap; }
        nav.links a { color: #0f172a; text-decoration: none; font-weight: 600; padding: 0.4rem 0.9rem; border-radius: 999px; transition: background 0.15s ease; }
        nav.links a:hover { background: #ccfbf1; }
        main { flex: 1; padding: 2rem 1.5rem; max-width: 1100px; margin: 0 auto; width: 100%; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 16px; border: 1px solid #e2e8f0; padding: 1.75rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .panel h2 { margin-top: 0; }
        label { display: block; margin-top: 1rem; margin-bottom: 0.4rem; font-weight: 600; color: #0f172a; }
        input, select { width: 100%; padding: 0.75rem; border-radius: 10px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; box-sizing: border-box; font-size: 1rem; }
        input:focus, select:focus { outline: none; border-color: #0d9488; box-shadow: 0 0 0 3px rgba(13, 148, 136, 0.15); }
        button { padding: 0.85rem 1.2rem; border: none; border-radius: 10px; background: #0d9488; color: #ffffff; font-weight: 600; cursor: pointer; transition: background 0.15s ease; }
        button:hover { background: #0f766e; }
        table { width: 100%; border-collapse: collapse; margin-top: 1.5rem; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
        th, td { padding: 0.7rem 0.9rem; border-bottom: 1px solid #e2e8f0; text-align: left; font-size: 0.93rem; }
        th { background: #ccfbf1; color: #134e4a; font-weight: 600; text-transform: uppercase; font-size: 0.8rem; letter-spacing: 0.04em; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .note { color: #475569; font-size: 0.95rem; line-height: 1.6; }
        .cards-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); margin-bottom: 2rem; }
        .event-card { background: #ffffff; border-radius: 16px; border: 1px solid #e2e8f0; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); padding: 1.5rem; display: flex; flex-direction: column; gap: 0.6rem; }
        .event-card h3 { margin: 0; }
        .event-card .fee { font-weight: 700; }
        .event-card a.register-link { align-self: flex-start; padding: 0.55rem 1.1rem; border-radius: 10px; background: #4f46e5; color: #ffffff; text-decoration: none; font-weight: 600; }
        .event-card a.register-link:hover { background: #4338ca; }
        .badge { display: inline-flex; align-items: center; padding: 0.25rem 0.75rem; border-radius: 999px; font-size: 0.82rem; font-weight: 600; }
        .badge.verified { background: #dcfce7; color: #166534; }
        .badge.pending { background: #fee2e2; color: #b91c1c; }
        .toggle-button { padding: 0.45rem 0.9rem; font-size: 0.85rem; }
        .toggle-button.unverify { background: #dc2626; }
        .toggle-button.unverify:hover { background: #b91c1c; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; padding-bottom: 1.5rem; }
        @media (max-width: 768px) {
            main { padding: 1.5rem 1rem; }
            table { font-size: 0.85rem; }
            th, td { padding: 0.5rem; }
        }
"#;

/// Shared page shell: nav bar, main column, footer.
pub fn render_page(meta_title: &str, body_html: &str) -> String {
    let footer = render_footer();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
{styles}
    </style>
</head>
<body>
    <header class="site-nav">
        <a class="brand" href="/">Cache2k25</a>
        <nav class="links">
            <a href="/">Home</a>
            <a href="/events">Events</a>
            <a href="/register">Register</a>
            <a href="/admin">Admin</a>
        </nav>
    </header>
    <main>
{body_html}
        {footer}
    </main>
</body>
</html>"#,
        meta_title = escape_html(meta_title),
        styles = SITE_BASE_STYLES,
        body_html = body_html,
        footer = footer,
    )
}

pub fn render_admin_login_page(error: Option<&str>) -> String {
    let flash = error
        .map(|message| format!(r#"<div class="flash error">{}</div>"#, escape_html(message)))
        .unwrap_or_default();

    let body = format!(
        r#"        <section class="panel" style="max-width: 420px; margin: 3rem auto;">
            <h2>Admin Login</h2>
            {flash}
            <form method="post" action="/admin/login">
                <label for="password">Admin Password</label>
                <input id="password" type="password" name="password" required>
                <button type="submit" style="margin-top: 1.5rem; width: 100%;">Login</button>
            </form>
        </section>
"#,
        flash = flash,
    );

    render_page("Admin Login — Cache2k25", &body)
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">© {year} Cache2k25 — Department of Computer Applications</footer>"#,
        year = current_year
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_significant_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn login_page_shows_error_flash_when_present() {
        let page = render_admin_login_page(Some("Wrong password."));
        assert!(page.contains("Wrong password."));
        assert!(render_admin_login_page(None).contains("Admin Login"));
    }
}
