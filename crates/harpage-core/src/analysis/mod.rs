mod sizes;
mod timings;

pub use sizes::SizeAnalyzer;
pub use timings::TimingAnalyzer;

use crate::page::{AssetCategory, HarPage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageReport {
    pub page_id: String,
    pub title: Option<String>,
    pub total_entries: usize,
    pub get_requests: usize,
    pub post_requests: usize,
    pub sizes: SizeStats,
    pub timings: TimingStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeStats {
    /// Body size of the root document, when it could be identified
    pub page_size: Option<u64>,
    pub total_size: u64,
    pub transfer_size: u64,
    pub categories: Vec<CategorySize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySize {
    pub category: AssetCategory,
    pub count: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingStats {
    pub total_load_time: f64,
    pub serial_load_time: f64,
    pub content_load_time: f64,
    pub html_load_time: f64,
    pub initial_load_time: Option<f64>,
    pub time_to_first_byte: Option<f64>,
    pub on_content_load: Option<f64>,
    pub on_load: Option<f64>,
    pub categories: Vec<CategoryTiming>,
    pub slowest_requests: Vec<SlowRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTiming {
    pub category: AssetCategory,
    pub load_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlowRequest {
    pub url: String,
    pub time: f64,
    pub method: String,
    pub status: i64,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, page: &HarPage) -> crate::Result<Self::Output>;
}

/// Runs the size and timing analyzers and assembles a [`PageReport`]
pub struct PageAnalyzer {
    top_n: usize,
}

impl PageAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Analyzer for PageAnalyzer {
    type Output = PageReport;

    fn analyze(&self, page: &HarPage) -> crate::Result<Self::Output> {
        let sizes = SizeAnalyzer.analyze(page)?;
        let timings = TimingAnalyzer::new(self.top_n).analyze(page)?;

        Ok(PageReport {
            page_id: page.page_id().to_string(),
            title: page.title().map(str::to_string),
            total_entries: page.entries().len(),
            get_requests: page.get_requests().len(),
            post_requests: page.post_requests().len(),
            sizes,
            timings,
        })
    }
}

/// Metrics derived from the root document are optional in a report: a
/// capture without one still yields every other number.
fn from_primary_entry<T>(result: crate::Result<T>) -> crate::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(crate::Error::MissingPrimaryEntry { page_id, url }) => {
            tracing::warn!("Page {} has no root document entry for '{}'", page_id, url);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
