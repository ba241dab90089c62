//! Server-rendered HTML pages.

const STYLE: &str = r#"<style>
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f8fa; margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; }
.card { background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 32px; max-width: 420px; width: 100%; }
h1 { font-size: 20px; margin: 0 0 8px; color: #14171a; }
.subtitle { color: #657786; font-size: 14px; margin: 0 0 24px; }
.flash { background: #fee; border: 1px solid #c00; color: #c00; padding: 10px; border-radius: 4px; margin-bottom: 16px; }
textarea { width: 100%; min-height: 96px; padding: 10px; border: 1px solid #ccd6dd; border-radius: 4px; font-size: 14px; box-sizing: border-box; }
button { width: 100%; padding: 10px; background: #1da1f2; color: #fff; border: none; border-radius: 4px; font-size: 14px; font-weight: 500; cursor: pointer; margin-top: 16px; }
button.link { background: none; color: #657786; margin-top: 8px; }
</style>"#;

/// Render the sign-in page.
pub fn render_login_page(flash: Option<&str>, authenticity_token: &str) -> String {
    let body = format!(
        r#"{flash_html}<form method="POST" action="/sessions">
<input type="hidden" name="authenticity_token" value="{token}">
<button type="submit">Sign in with Twitter</button>
</form>"#,
        flash_html = flash_html(flash),
        token = html_escape(authenticity_token),
    );
    layout("Sign in", "Post a tweet from anywhere.", &body)
}

/// Render the compose page for a signed-in user.
pub fn render_compose_page(screen_name: &str, authenticity_token: &str) -> String {
    let token = html_escape(authenticity_token);
    let body = format!(
        r#"<form method="POST" action="/tweets">
<input type="hidden" name="authenticity_token" value="{token}">
<label for="tweet">What's happening?</label>
<textarea id="tweet" name="tweet" autofocus></textarea>
<button type="submit">Tweet</button>
</form>
<form method="POST" action="/sessions/destroy">
<input type="hidden" name="authenticity_token" value="{token}">
<button type="submit" class="link">Sign out</button>
</form>"#
    );
    let subtitle = format!("Signed in as <strong>@{}</strong>", html_escape(screen_name));
    layout("Compose", &subtitle, &body)
}

fn flash_html(flash: Option<&str>) -> String {
    flash
        .map(|msg| format!(r#"<div class="flash">{}</div>"#, html_escape(msg)))
        .unwrap_or_default()
}

fn layout(title: &str, subtitle: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title} - Tweet Relay</title>
{STYLE}
</head>
<body>
<div class="card">
<h1>Tweet Relay</h1>
<p class="subtitle">{subtitle}</p>
{body}
</div>
</body>
</html>"#
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
