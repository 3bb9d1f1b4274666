//! Query synchronizer: keeps a URL and its parameter rows consistent.
//!
//! The binding is modelled as two one-directional updates that the caller
//! invokes explicitly:
//!
//! - [`url_changed`] re-derives the rows from an edited URL, but only when
//!   the new URL yields at least one parameter. Interim typing that parses
//!   to nothing leaves the existing rows alone; the flip side is that
//!   deleting the whole query string by hand does not clear the rows.
//! - [`params_changed`] rebuilds the URL from its base and the rows, and
//!   reports a new URL only if it differs textually from the current one,
//!   so applying the result never re-triggers an update.
//!
//! Malformed URLs are never an error here: parsing yields no rows and
//! building returns the input unchanged.

use url::{Position, Url, form_urlencoded};

use super::QueryParam;

/// Extracts every query key/value pair from `url`, in order, all enabled.
///
/// Returns an empty list if `url` does not parse.
#[must_use]
pub fn parse_query_string(url: &str) -> Vec<QueryParam> {
    Url::parse(url)
        .map(|parsed| {
            parsed
                .query_pairs()
                .map(|(key, value)| QueryParam::new(key, value))
                .collect()
        })
        .unwrap_or_default()
}

/// Serializes the active rows (enabled, non-empty key) as a query string.
#[must_use]
pub fn build_query_string(params: &[QueryParam]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for param in params.iter().filter(|p| p.is_active()) {
        serializer.append_pair(&param.key, &param.value);
    }
    serializer.finish()
}

/// Rebuilds a URL from the scheme, host and path of `base_url` plus the
/// active rows of `params`, in row order.
///
/// Any query or fragment already on `base_url` is replaced. Returns
/// `base_url` unchanged if it does not parse.
#[must_use]
pub fn build_url(base_url: &str, params: &[QueryParam]) -> String {
    let Ok(parsed) = Url::parse(base_url) else {
        return base_url.to_string();
    };
    let query = build_query_string(params);
    let base = origin_and_path(&parsed);
    if query.is_empty() {
        base
    } else {
        format!("{base}?{query}")
    }
}

/// Returns `url` without its query string (and fragment).
///
/// Returns `url` unchanged if it does not parse.
#[must_use]
pub fn get_base_url(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), |parsed| origin_and_path(&parsed))
}

/// URL-to-rows direction of the binding.
///
/// Returns the rows to install, or `None` when the current rows must be
/// kept because `new_url` yields no parameters.
#[must_use]
pub fn url_changed(new_url: &str) -> Option<Vec<QueryParam>> {
    let params = parse_query_string(new_url);
    if params.is_empty() { None } else { Some(params) }
}

/// Rows-to-URL direction of the binding.
///
/// Returns the URL to install, or `None` when the rebuilt URL is textually
/// identical to `current_url`.
#[must_use]
pub fn params_changed(current_url: &str, params: &[QueryParam]) -> Option<String> {
    let rebuilt = build_url(&get_base_url(current_url), params);
    if rebuilt == current_url {
        None
    } else {
        Some(rebuilt)
    }
}

/// Scheme, host, port and path; user info, query and fragment dropped.
fn origin_and_path(url: &Url) -> String {
    let origin = url.origin();
    if origin.is_tuple() {
        format!("{}{}", origin.ascii_serialization(), url.path())
    } else {
        url[..Position::AfterPath].to_string()
    }
}
