//! HTTP response domain types

mod spec;

pub use spec::{Response, ResponseBody, StatusCode, StatusColorCategory, format_size};
