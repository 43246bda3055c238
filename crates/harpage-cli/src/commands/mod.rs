use std::borrow::Cow;

pub mod filter;
pub mod pages;
pub mod report;

/// Quote a value for a CSV row when it holds a comma, quote or line break
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
