use super::time::parse_timestamp;
use crate::Result;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Top-level HAR object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Har {
    pub log: Log,
}

/// Main HAR log object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub creator: Creator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Creator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Creator/Browser information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Page information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "startedDateTime", default)]
    pub started_date_time: String,
    pub id: String,
    /// Root URL of the page as recorded by the browser.
    #[serde(default)]
    pub title: String,
    #[serde(rename = "pageTimings", default)]
    pub page_timings: PageTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Page timing information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageTimings {
    #[serde(rename = "onContentLoad", skip_serializing_if = "Option::is_none")]
    pub on_content_load: Option<f64>,
    #[serde(rename = "onLoad", skip_serializing_if = "Option::is_none")]
    pub on_load: Option<f64>,
}

/// Individual HTTP transaction entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "pageref", skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: String,
    /// Total elapsed time of the request in milliseconds.
    pub time: f64,
    pub request: Request,
    pub response: Response,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timings: Option<Timings>,
    #[serde(rename = "serverIPAddress", skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

impl Entry {
    /// Parsed `startedDateTime`, offset preserved.
    pub fn started_at(&self) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(&self.started_date_time)
    }

    /// Response header lookup, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.header(name)
    }

    /// Value of the response `Content-Type` header, if the response carries one.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Body size in bytes. Missing or negative sizes count as zero.
    pub fn size(&self) -> u64 {
        self.response.content.size.unwrap_or(0).max(0) as u64
    }

    /// Elapsed time with negative values clamped to zero.
    pub fn duration_ms(&self) -> f64 {
        self.time.max(0.0)
    }
}

/// HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion", default)]
    pub http_version: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
}

/// HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: i64,
    #[serde(rename = "statusText", default)]
    pub status_text: String,
    #[serde(rename = "httpVersion", default)]
    pub http_version: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub content: Content,
    #[serde(rename = "redirectURL", default)]
    pub redirect_url: String,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
}

impl Response {
    /// First header whose name matches `name`, ignoring ASCII case.
    ///
    /// Returns `None` when the response does not carry the header at all.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Bytes on the wire: headers plus body, with `-1` (unknown) counted as zero.
    pub fn transfer_size(&self) -> u64 {
        self.headers_size.max(0).saturating_add(self.body_size.max(0)) as u64
    }
}

/// HTTP header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Response content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

/// Timing information
///
/// HAR writes `-1` for phases that do not apply, so every accessor clamps
/// negative values to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receive: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<f64>,
}

impl Timings {
    /// Everything before the first response byte arrives.
    ///
    /// `ssl` is not added separately: HAR already counts it inside `connect`.
    pub fn before_receive(&self) -> f64 {
        [self.blocked, self.dns, self.connect, self.send, self.wait]
            .into_iter()
            .map(phase)
            .sum()
    }

    pub fn receive(&self) -> f64 {
        phase(self.receive)
    }
}

fn phase(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).max(0.0)
}

fn unknown_size() -> i64 {
    -1
}
