//! Request equality used to deduplicate history and saved requests.

use super::Request;

/// Returns true if two requests are the same for history purposes.
///
/// All of the following must hold:
/// - URLs match after stripping exactly one trailing `/` from each side
/// - methods match exactly
/// - bodies match after trimming surrounding whitespace
/// - headers hold the same keys and values, in any order
/// - auth configurations are identical
#[must_use]
pub fn requests_equal(a: &Request, b: &Request) -> bool {
    strip_trailing_slash(&a.url) == strip_trailing_slash(&b.url)
        && a.method == b.method
        && a.body.trim() == b.body.trim()
        && a.headers.canonical() == b.headers.canonical()
        && a.auth == b.auth
}

/// Returns true if any request in `existing` equals `candidate`.
pub fn is_duplicate<'a>(
    candidate: &Request,
    existing: impl IntoIterator<Item = &'a Request>,
) -> bool {
    existing
        .into_iter()
        .any(|request| requests_equal(request, candidate))
}

fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
