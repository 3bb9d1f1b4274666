//! HTTP request domain types and the pure functions that operate on them.

mod body;
mod equality;
mod headers;
mod method;
mod query;
mod spec;
pub mod url_sync;

pub use body::{format_json, is_valid_json, validate_body};
pub use equality::{is_duplicate, requests_equal};
pub use headers::Headers;
pub use method::HttpMethod;
pub use query::QueryParam;
pub use spec::Request;
pub use url_sync::{build_url, get_base_url, params_changed, parse_query_string, url_changed};
