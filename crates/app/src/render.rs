//! Plain-text rendering of session state for the terminal.

use chrono::{DateTime, Utc};
use khabari_domain::{HistoryItem, Response, StatusColorCategory, Tab};

/// One-line summary: status, elapsed time and size.
pub fn status_line(response: &Response) -> String {
    let marker = match response.status_code().color_category() {
        StatusColorCategory::Success => "ok",
        StatusColorCategory::Informational | StatusColorCategory::Redirection => "info",
        StatusColorCategory::ClientError => "client error",
        StatusColorCategory::ServerError => "server error",
        StatusColorCategory::Unknown => "unknown",
    };
    format!(
        "{} {} ({marker})  {}  {}",
        response.status(),
        response.status_text(),
        response.elapsed_display(),
        response.size_display()
    )
}

/// Full response: status line, optional headers and the body.
pub fn response(response: &Response, include_headers: bool) -> String {
    let mut out = status_line(response);
    out.push('\n');
    if include_headers {
        for (name, value) in response.headers() {
            out.push_str(&format!("{name}: {value}\n"));
        }
        out.push('\n');
    }
    out.push_str(&response.data().pretty());
    out
}

/// One line per history or saved item.
pub fn items(items: &[HistoryItem], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (index, item) in items.iter().enumerate() {
        let outcome = match (&item.response, &item.error) {
            (Some(response), _) => response.status().to_string(),
            (None, Some(_)) => "ERR".to_string(),
            (None, None) => "-".to_string(),
        };
        out.push_str(&format!(
            "{index:>3}  {:<7} {:<4} {}  [{}]  {}\n",
            item.request.method,
            outcome,
            item.request.title(),
            item.request.id(),
            item.time_ago(now)
        ));
    }
    out
}

/// One line per tab; the active one is marked with `*` and shows its
/// focused editor section.
pub fn tabs(tabs: &[Tab], active: &str) -> String {
    let mut out = String::new();
    for tab in tabs {
        let line = if tab.id() == active {
            format!(
                "* {}  {:<7} {}  ({})\n",
                tab.id(),
                tab.request.method,
                tab.title,
                tab.section.as_str()
            )
        } else {
            format!("  {}  {:<7} {}\n", tab.id(), tab.request.method, tab.title)
        };
        out.push_str(&line);
    }
    out
}
