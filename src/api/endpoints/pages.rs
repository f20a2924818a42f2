//! Navigation surface: server-rendered pages.
//!
//! `/` and `/login` are public; `/prediction` sits behind the page guard.
//! Pages drive the JSON API with small inline scripts; every state change
//! goes through `/api`.

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::Extension;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, IdentityContext};
use crate::config::APP_NAME;
use crate::forms::FormState;
use crate::models::{ChatMessage, FieldKind, Record};
use crate::personas::{list_claim_personas, list_liver_personas, PersonaSummary};
use crate::render::{present_claim_prediction, present_outcome, present_prediction, ResultView};

use super::auth::POST_LOGIN_PATH;

#[derive(Deserialize)]
pub struct LoginQuery {
    pub from: Option<String>,
}

/// `GET /`
pub async fn home(State(ctx): State<ApiContext>) -> Result<Html<String>, ApiError> {
    let signed_in = ctx.core.current_identity()?.is_some();
    let action = if signed_in {
        format!(r#"<a class="btn" href="{POST_LOGIN_PATH}">Open diagnostic workspace</a>"#)
    } else {
        r#"<a class="btn" href="/login">Physician Login</a>"#.to_string()
    };

    let body = format!(
        r##"<section class="hero">
  <h1>Advanced AI for <span>Liver Disease Prediction</span></h1>
  <p>Structured risk assessment from standard liver function tests, insurance claim screening, and a reference assistant for clinicians.</p>
  {action}
</section>
<section class="features">
  <h2>Features</h2>
  <div class="card"><h3>AI-Powered Analysis</h3><p>Lab values are assessed by a language model that answers in a fixed schema.</p></div>
  <div class="card"><h3>Secure &amp; Private</h3><p>Nothing is stored beyond the signed-in physician on this machine.</p></div>
  <div class="card"><h3>Real-time Results</h3><p>Color-coded risk tiers with rationale and recommendations.</p></div>
</section>"##
    );
    Ok(Html(layout("Home", &body)))
}

/// `GET /login`
///
/// The remembered location is shown, never followed: a successful login
/// always lands on the workspace.
pub async fn login(Query(query): Query<LoginQuery>) -> Html<String> {
    let requested = query
        .from
        .as_deref()
        .map(|from| format!(r#"<p class="muted">Sign in to continue to {}</p>"#, escape(from)))
        .unwrap_or_default();

    let body = format!(
        r##"<section class="card narrow">
  <h1>Physician Login</h1>
  <p>Access the {APP_NAME} diagnostic portal</p>
  {requested}
  <form id="login">
    <label>Email Address <input name="email" type="email" placeholder="doctor@hospital.com" required></label>
    <label>Password <input name="password" type="password" required></label>
    <p id="error" class="error" hidden></p>
    <button type="submit">Sign in</button>
  </form>
</section>
<script>
document.getElementById('login').addEventListener('submit', async (e) => {{
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch('/api/auth/login', {{
    method: 'POST',
    headers: {{ 'Content-Type': 'application/json' }},
    body: JSON.stringify({{ email: form.get('email'), password: form.get('password') }}),
  }});
  if (res.ok) {{ location.href = '{POST_LOGIN_PATH}'; return; }}
  const err = await res.json();
  const box = document.getElementById('error');
  box.textContent = err.error.message;
  box.hidden = false;
}});
</script>"##
    );
    Html(layout("Login", &body))
}

/// `GET /prediction`
pub async fn prediction(
    State(ctx): State<ApiContext>,
    Extension(who): Extension<IdentityContext>,
) -> Result<Html<String>, ApiError> {
    let (liver, claims) = ctx.core.with_workspace(|ws| {
        (
            render_form(
                "liver",
                "Patient Diagnostic Form",
                &ws.liver,
                &list_liver_personas(),
                present_prediction,
            ),
            render_form(
                "claims",
                "Claim Fraud Detection",
                &ws.claim,
                &list_claim_personas(),
                present_claim_prediction,
            ),
        )
    })?;
    let chat = render_transcript(&ctx.core.chat_messages()?);

    let body = format!(
        r##"<header class="who">Signed in as <strong>{name}</strong> ({email}) <button onclick="fetch('/api/auth/logout',{{method:'POST'}}).then(()=>location.href='/')">Log out</button></header>
{liver}
{claims}
{chat}
<script>
async function call(method, url, body) {{
  const res = await fetch(url, {{ method, headers: {{ 'Content-Type': 'application/json' }}, body: body && JSON.stringify(body) }});
  if (!res.ok) {{ const err = await res.json(); alert(err.error.message); }}
  location.reload();
}}
</script>"##,
        name = escape(&who.identity.name),
        email = escape(&who.identity.email),
    );
    Ok(Html(layout("Prediction", &body)))
}

/// Anything unmatched goes home.
pub async fn redirect_home() -> Redirect {
    Redirect::to("/")
}

// ═══════════════════════════════════════════════════════════
// Rendering helpers
// ═══════════════════════════════════════════════════════════

fn render_form<R: Record, T>(
    slug: &str,
    title: &str,
    form: &FormState<R, T>,
    personas: &[PersonaSummary],
    present: fn(&T) -> ResultView,
) -> String {
    let mut fields = String::new();
    for spec in R::FIELDS {
        let value = escape(&form.record().get(spec.name).unwrap_or_default());
        let label = match spec.unit {
            Some(unit) => format!("{} ({unit})", spec.label),
            None => spec.label.to_string(),
        };
        let onchange = format!(
            "call('PUT','/api/{slug}/fields',{{name:'{}',value:this.value}})",
            spec.name
        );
        let input = match spec.kind {
            FieldKind::Choice(options) => {
                let options: String = options
                    .iter()
                    .map(|o| {
                        let selected = if *o == value { " selected" } else { "" };
                        format!("<option{selected}>{o}</option>")
                    })
                    .collect();
                format!(r#"<select onchange="{onchange}">{options}</select>"#)
            }
            FieldKind::Number => {
                format!(r#"<input type="number" step="any" value="{value}" onchange="{onchange}">"#)
            }
            FieldKind::Text => format!(r#"<input value="{value}" onchange="{onchange}">"#),
        };
        fields.push_str(&format!("<label>{}{input}</label>\n", escape(&label)));
    }

    let persona_buttons: String = personas
        .iter()
        .map(|p| {
            format!(
                r#"<button onclick="call('POST','/api/{slug}/persona/{}')">{}</button>"#,
                p.key,
                escape(p.label)
            )
        })
        .collect();

    let error = form
        .error()
        .map(|e| format!(r#"<div class="error"><h3>Error</h3><p>{}</p></div>"#, escape(e)))
        .unwrap_or_default();

    let result = form
        .result()
        .map(|outcome| render_result(&present_outcome(outcome, present)))
        .unwrap_or_else(|| r#"<p class="muted">Submit the form to see the assessment.</p>"#.into());

    let submit_label = if form.is_pending() { "Analyzing..." } else { "Analyze" };

    format!(
        r##"<section class="card" id="{slug}">
  <h1>{title}</h1>
  <div class="personas">{persona_buttons}</div>
  <div class="fields">{fields}</div>
  <button onclick="call('POST','/api/{slug}/reset')">Reset</button>
  <button onclick="call('POST','/api/{slug}/submit')">{submit_label}</button>
  {error}
  <div class="result">{result}</div>
</section>"##
    )
}

fn render_result(view: &ResultView) -> String {
    let items: String = view
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect();
    let note = if view.placeholder {
        r#"<p class="muted">Placeholder result: no API key configured.</p>"#
    } else {
        ""
    };
    format!(
        r##"<div class="tier tier-{tier}">
  <h3>{label}</h3>
  <p>{score_label}: {score:.0}%</p>
  <p>{rationale}</p>
  <h4>{heading}</h4><ul>{items}</ul>
  {note}
</div>"##,
        tier = serde_json::to_value(view.tier)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        label = escape(&view.label),
        score_label = view.score_label,
        score = view.score,
        rationale = escape(&view.rationale),
        heading = view.items_heading,
    )
}

fn render_transcript(messages: &[ChatMessage]) -> String {
    let lines: String = messages
        .iter()
        .map(|m| {
            format!(
                r#"<div class="msg msg-{}">{}</div>"#,
                m.role.as_str(),
                escape(&m.text)
            )
        })
        .collect();
    format!(
        r##"<aside class="card chat">
  <h2>Dr. Assistant</h2>
  <div class="messages">{lines}</div>
  <form onsubmit="event.preventDefault(); call('POST','/api/chat/send',{{message:this.message.value}})">
    <input name="message" placeholder="Ask about lab values, guidelines...">
    <button type="submit">Send</button>
  </form>
</aside>"##
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {APP_NAME}</title>
<style>
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f9fafb;color:#111827}}
nav{{display:flex;gap:16px;padding:16px 24px;background:#fff;border-bottom:1px solid #e5e7eb}}
main{{max-width:1100px;margin:0 auto;padding:24px}}
.card{{background:#fff;border-radius:12px;box-shadow:0 1px 4px rgba(0,0,0,.06);padding:24px;margin-bottom:24px}}
.narrow{{max-width:420px;margin:48px auto}}
label{{display:block;margin:8px 0}}
.error{{background:#fef2f2;color:#991b1b;padding:12px;border-radius:8px}}
.muted{{color:#6b7280}}
.tier-red{{border-left:6px solid #dc2626;padding-left:12px}}
.tier-yellow{{border-left:6px solid #ca8a04;padding-left:12px}}
.tier-green{{border-left:6px solid #16a34a;padding-left:12px}}
.msg-user{{text-align:right}}
footer{{text-align:center;color:#9ca3af;font-size:.8rem;padding:24px}}
</style>
</head>
<body>
<nav><a href="/"><strong>{APP_NAME}</strong></a><a href="/prediction">Workspace</a><a href="/login">Physician Login</a></nav>
<main>
{body}
</main>
<footer>&copy; {APP_NAME} AI. For Research Use Only.</footer>
</body>
</html>"##
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
