use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse HAR file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid HAR structure: {0}")]
    InvalidStructure(String),

    #[error("A HAR document or parser is required to build a page")]
    MissingSource,

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("No GET entry for {url} on page {page_id}")]
    MissingPrimaryEntry { page_id: String, url: String },

    #[error("Invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
