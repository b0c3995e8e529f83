//! Server-rendered HTML. Each page is a small fragment wrapped in a shared layout.

use std::fmt::Write as _;

use axum::response::{Html, IntoResponse};
use axum_extra::extract::cookie::CookieJar;
use chrono::{NaiveDate, NaiveDateTime};

use jar_types::{MemoryEntry, Mood};

use crate::error::AppError;
use crate::flash;
use crate::mood::MoodSummary;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Nav {
    Guest,
    Member,
}

pub async fn faq(jar: CookieJar) -> impl IntoResponse {
    let (jar, message) = flash::take(jar);
    (jar, Html(faq_page(message.as_deref())))
}

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}

pub fn index(username: &str, flash: Option<&str>) -> String {
    let body = format!(
        "<h1>Welcome back, {}</h1>
<p>Every day leaves something worth keeping. Put it in the jar.</p>
<p><a class=\"button\" href=\"/new\">Add a memory</a> <a class=\"button\" href=\"/past\">Pull one out</a></p>",
        escape(username)
    );
    layout("Home", flash, Nav::Member, &body)
}

pub fn past(entry: &MemoryEntry, flash: Option<&str>) -> String {
    let body = format!(
        "<h1>From the jar</h1>
<blockquote class=\"memory\">
  <p>{}</p>
  <footer>{} &middot; {}</footer>
</blockquote>
<p><a class=\"button\" href=\"/past\">Another one</a></p>",
        escape(&entry.memory),
        mood_badge(entry.mood.as_deref()),
        escape(&display_timestamp(&entry.created_at)),
    );
    layout("A past memory", flash, Nav::Member, &body)
}

pub fn new_memory(flash: Option<&str>) -> String {
    let mut options = String::from("<option value=\"\" disabled selected>How did it feel?</option>");
    for mood in Mood::ALL {
        let _ = write!(options, "<option value=\"{0}\">{0}</option>", mood.label());
    }
    let body = format!(
        "<h1>New memory</h1>
<form action=\"/new\" method=\"post\">
  <textarea name=\"memory\" rows=\"4\" placeholder=\"What happened?\" autofocus></textarea>
  <select name=\"mood\">{options}</select>
  <button type=\"submit\">Save</button>
</form>"
    );
    layout("New memory", flash, Nav::Member, &body)
}

pub fn login(flash: Option<&str>) -> String {
    let body = "<h1>Log in</h1>
<form action=\"/login\" method=\"post\">
  <input name=\"username\" placeholder=\"Username\" autocomplete=\"username\" autofocus>
  <input name=\"password\" type=\"password\" placeholder=\"Password\" autocomplete=\"current-password\">
  <button type=\"submit\">Log in</button>
</form>
<p>No account yet? <a href=\"/register\">Register</a>.</p>";
    layout("Log in", flash, Nav::Guest, body)
}

pub fn register(flash: Option<&str>) -> String {
    let body = "<h1>Register</h1>
<form action=\"/register\" method=\"post\">
  <input name=\"username\" placeholder=\"Username\" autocomplete=\"username\" autofocus>
  <input name=\"password\" type=\"password\" placeholder=\"Password\" autocomplete=\"new-password\">
  <input name=\"confirmation\" type=\"password\" placeholder=\"Confirm password\" autocomplete=\"new-password\">
  <button type=\"submit\">Register</button>
</form>";
    layout("Register", flash, Nav::Guest, body)
}

fn faq_page(flash: Option<&str>) -> String {
    let body = "<h1>What is this?</h1>
<dl>
  <dt>What goes in the jar?</dt>
  <dd>Short notes about moments you want to remember, each tagged with how it felt.</dd>
  <dt>Who can read my memories?</dt>
  <dd>Only you. Every page except this one and the login forms requires you to be signed in.</dd>
  <dt>How is the happiest month picked?</dt>
  <dd>Each memory scores by mood: happy 3, content 2, neutral 1, sad 0. The month or year with the highest total wins.</dd>
  <dt>Can I take my data with me?</dt>
  <dd>Yes. The history page offers CSV, JSON and plain text downloads.</dd>
</dl>
<p><a href=\"/login\">Log in</a> or <a href=\"/register\">register</a> to start.</p>";
    layout("FAQ", flash, Nav::Guest, body)
}

pub fn history(entries: &[MemoryEntry], flash: Option<&str>) -> String {
    let mut body = String::from(
        "<h1>History</h1>
<p>Download: <a href=\"/export?format=csv\">CSV</a> &middot; <a href=\"/export?format=json\">JSON</a> &middot; <a href=\"/export?format=txt\">Text</a></p>",
    );

    if entries.is_empty() {
        body.push_str("<p>Nothing here yet. <a href=\"/new\">Add your first memory</a>.</p>");
    } else {
        body.push_str("<ul class=\"history\">");
        for entry in entries {
            let _ = write!(
                body,
                "<li><time>{}</time> {} <p>{}</p></li>",
                escape(&display_timestamp(&entry.created_at)),
                mood_badge(entry.mood.as_deref()),
                escape(&entry.memory),
            );
        }
        body.push_str("</ul>");
    }

    layout("History", flash, Nav::Member, &body)
}

pub fn mood(summary: &MoodSummary, flash: Option<&str>) -> String {
    let mut body = String::from("<h1>Mood</h1>");

    if !summary.has_memories() {
        body.push_str("<p>You haven’t added any memories yet, so there is nothing to chart.</p>");
        return layout("Mood", flash, Nav::Member, &body);
    }

    body.push_str("<table class=\"counts\"><tr><th>Mood</th><th>Memories</th></tr>");
    for (label, count) in &summary.counts {
        let _ = write!(body, "<tr><td>{}</td><td>{}</td></tr>", escape(label), count);
    }
    body.push_str("</table>");

    if let Some(month) = &summary.happiest_month {
        let _ = write!(body, "<p>Happiest month: <strong>{}</strong></p>", escape(&month_label(month)));
    }
    if let Some(year) = &summary.happiest_year {
        let _ = write!(body, "<p>Happiest year: <strong>{}</strong></p>", escape(year));
    }

    body.push_str(
        "<canvas id=\"moodChart\" width=\"320\" height=\"320\"></canvas>
<script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>
<script src=\"/static/script.js\"></script>",
    );
    layout("Mood", flash, Nav::Member, &body)
}

pub fn not_found() -> String {
    let body = "<h1>404</h1>
<p>That page isn’t in the jar.</p>
<p><a href=\"/\">Go home</a></p>";
    layout("Not found", None, Nav::Guest, body)
}

fn layout(title: &str, flash: Option<&str>, nav: Nav, body: &str) -> String {
    let links = match nav {
        Nav::Member => {
            "<a href=\"/\">Home</a> <a href=\"/new\">New</a> <a href=\"/past\">Past</a> \
             <a href=\"/history\">History</a> <a href=\"/mood\">Mood</a> <a href=\"/faq\">FAQ</a> \
             <a href=\"/logout\">Log out</a>"
        }
        Nav::Guest => {
            "<a href=\"/faq\">FAQ</a> <a href=\"/login\">Log in</a> <a href=\"/register\">Register</a>"
        }
    };
    let flash = flash
        .map(|m| format!("<div class=\"flash\" role=\"alert\">{}</div>", escape(m)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>Memory Jar: {}</title>
</head>
<body>
<nav>{links}</nav>
{flash}
<main>
{body}
</main>
</body>
</html>
",
        escape(title)
    )
}

fn mood_badge(mood: Option<&str>) -> String {
    match mood {
        Some(label) => format!("<span class=\"mood\">{}</span>", escape(label)),
        None => String::new(),
    }
}

/// `Mar 02, 2024 at 09:15 PM`
pub fn display_timestamp(at: &NaiveDateTime) -> String {
    at.format("%b %d, %Y at %I:%M %p").to_string()
}

/// `2024-03` → `March 2024`. Keys that do not parse are shown as-is.
pub fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;
    use jar_types::TIMESTAMP_FORMAT;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<script>alert(\"x\") & 'y'</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_date_labels() {
        let at = NaiveDateTime::parse_from_str("2024-03-02 21:15:00", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(display_timestamp(&at), "Mar 02, 2024 at 09:15 PM");
        assert_eq!(month_label("2024-03"), "March 2024");
        assert_eq!(month_label("garbage"), "garbage");
    }

    #[test]
    fn test_history_escapes_memory_text() {
        let entry = MemoryEntry {
            memory: "<b>bold</b>".into(),
            mood: Some("happy".into()),
            created_at: NaiveDateTime::default(),
        };
        let html = history(&[entry], Some("hi"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("<div class=\"flash\" role=\"alert\">hi</div>"));
    }
}
