use super::{Analyzer, CategoryTiming, SlowRequest, TimingStats, from_primary_entry};
use crate::Result;
use crate::page::{AssetCategory, HarPage};

pub struct TimingAnalyzer {
    top_n: usize,
}

impl TimingAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for TimingAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Analyzer for TimingAnalyzer {
    type Output = TimingStats;

    fn analyze(&self, page: &HarPage) -> Result<Self::Output> {
        tracing::debug!("Analyzing load times for page {}", page.page_id());

        let categories = AssetCategory::ALL
            .iter()
            .map(|&category| {
                Ok(CategoryTiming {
                    category,
                    load_time: page.load_time(category)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut slowest_requests: Vec<SlowRequest> = page
            .entries()
            .iter()
            .map(|e| SlowRequest {
                url: e.request.url.clone(),
                time: e.time,
                method: e.request.method.clone(),
                status: e.response.status,
            })
            .collect();

        // stable, so equally slow requests keep their start order
        slowest_requests.sort_by(|a, b| b.time.total_cmp(&a.time));
        slowest_requests.truncate(self.top_n);

        let stats = TimingStats {
            total_load_time: page.total_load_time()?,
            serial_load_time: page.serial_load_time(),
            content_load_time: page.content_load_time()?,
            html_load_time: page.html_load_time()?,
            initial_load_time: from_primary_entry(page.initial_load_time())?,
            time_to_first_byte: from_primary_entry(page.time_to_first_byte())?,
            on_content_load: page.on_content_load(),
            on_load: page.on_load(),
            categories,
            slowest_requests,
        };

        tracing::info!(
            "Timing analysis complete: load={:.2}ms, serial={:.2}ms",
            stats.total_load_time,
            stats.serial_load_time
        );

        Ok(stats)
    }
}
