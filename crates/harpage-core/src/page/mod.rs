//! Per-page view of a HAR capture.
//!
//! A [`HarPage`] holds the entries recorded for one page, ordered by start
//! time, and derives sizes and load times from them on every call. Nothing
//! is cached, so repeated calls always agree with the underlying entries.

mod category;

pub use category::AssetCategory;

use crate::filter::EntryFilter;
use crate::har::{Entry, Har, HarParser, PageTimings, UNKNOWN_PAGE_ID, parser};
use crate::timing::{LoadPhase, LoadTimeAnalyzer, TimingModel};
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref GET_METHOD: Regex = Regex::new("GET").unwrap();
    static ref POST_METHOD: Regex = Regex::new("POST").unwrap();
    static ref HTML_CONTENT: Regex = Regex::new("html").unwrap();
}

/// Builds a [`HarPage`] from either a HAR document or a [`HarParser`]
#[derive(Debug)]
pub struct HarPageBuilder<'a> {
    page_id: String,
    har: Option<&'a Har>,
    parser: Option<&'a HarParser>,
}

impl<'a> HarPageBuilder<'a> {
    pub fn with_har(mut self, har: &'a Har) -> Self {
        self.har = Some(har);
        self
    }

    pub fn with_parser(mut self, parser: &'a HarParser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Collect and time-order the page's entries.
    ///
    /// A parser takes precedence over a document when both are given.
    pub fn build(self) -> Result<HarPage> {
        let har = match (self.parser, self.har) {
            (Some(parser), _) => parser.har(),
            (None, Some(har)) => har,
            (None, None) => return Err(Error::MissingSource),
        };
        HarPage::from_har(&self.page_id, har)
    }
}

#[derive(Debug, Clone)]
pub struct HarPage {
    page_id: String,
    title: Option<String>,
    started_date_time: Option<String>,
    page_timings: PageTimings,
    entries: Vec<Entry>,
}

impl HarPage {
    pub fn builder<'a>(page_id: impl Into<String>) -> HarPageBuilder<'a> {
        HarPageBuilder {
            page_id: page_id.into(),
            har: None,
            parser: None,
        }
    }

    /// Build the page `page_id` from a parsed HAR document
    pub fn from_har(page_id: &str, har: &Har) -> Result<Self> {
        tracing::debug!("Building page {}", page_id);

        let log = &har.log;
        let info = parser::page_info(log, page_id);
        let unknown = page_id == UNKNOWN_PAGE_ID && parser::has_orphans(log);
        if info.is_none() && !unknown {
            return Err(Error::PageNotFound(page_id.to_string()));
        }

        let mut timed = parser::entries_for(log, page_id)
            .into_iter()
            .map(|entry| Ok((entry.started_at()?, entry.clone())))
            .collect::<Result<Vec<_>>>()?;
        // stable: entries starting at the same instant keep document order
        timed.sort_by_key(|(started, _)| *started);

        let entries: Vec<Entry> = timed.into_iter().map(|(_, entry)| entry).collect();
        if entries.is_empty() {
            tracing::warn!("Page {} has no entries", page_id);
        }

        tracing::info!("Loaded page {} with {} entries", page_id, entries.len());

        Ok(Self {
            page_id: page_id.to_string(),
            title: info.map(|p| p.title.clone()),
            started_date_time: info.map(|p| p.started_date_time.clone()),
            page_timings: info.map(|p| p.page_timings.clone()).unwrap_or_default(),
            entries,
        })
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    /// Root URL recorded for the page, `None` for the unknown page
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn started_date_time(&self) -> Option<&str> {
        self.started_date_time.as_deref()
    }

    /// Host of the page's root URL
    pub fn hostname(&self) -> Option<String> {
        let url = Url::parse(self.title.as_deref()?).ok()?;
        url.host_str().map(str::to_string)
    }

    /// Entries ordered by `startedDateTime`
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn filter_entries(&self, filter: &EntryFilter) -> Vec<&Entry> {
        filter.apply(&self.entries)
    }

    /// Load time of the entries matching `filter` under `model`
    pub fn get_load_time(&self, filter: &EntryFilter, model: TimingModel) -> Result<f64> {
        LoadTimeAnalyzer::new(model).load_time(self.filter_entries(filter))
    }

    /// Entries of one content category. Categories never share an entry.
    pub fn files(&self, category: AssetCategory) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| AssetCategory::of(entry) == category)
            .collect()
    }

    pub fn image_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Image)
    }

    pub fn css_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Css)
    }

    pub fn js_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Js)
    }

    pub fn audio_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Audio)
    }

    pub fn video_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Video)
    }

    pub fn text_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Text)
    }

    pub fn misc_files(&self) -> Vec<&Entry> {
        self.files(AssetCategory::Misc)
    }

    /// Entries whose Content-Type mentions `html`. Not a partition: most
    /// overlap [`AssetCategory::Text`], while `application/xhtml+xml` lands
    /// in misc.
    pub fn html_files(&self) -> Vec<&Entry> {
        self.filter_entries(&content_filter(&HTML_CONTENT))
    }

    pub fn requests_with_method(&self, pattern: &str) -> Result<Vec<&Entry>> {
        let filter = EntryFilter::new().with_request_type(pattern)?;
        Ok(self.filter_entries(&filter))
    }

    pub fn get_requests(&self) -> Vec<&Entry> {
        self.filter_entries(&method_filter(&GET_METHOD))
    }

    pub fn post_requests(&self) -> Vec<&Entry> {
        self.filter_entries(&method_filter(&POST_METHOD))
    }

    /// The GET request for the page's root URL
    pub fn actual_page(&self) -> Result<&Entry> {
        let missing = || Error::MissingPrimaryEntry {
            page_id: self.page_id.clone(),
            url: self.title.clone().unwrap_or_default(),
        };
        let root = self.title.as_deref().ok_or_else(missing)?;

        self.entries
            .iter()
            .find(|entry| {
                entry.request.method.eq_ignore_ascii_case("GET")
                    && same_url(&entry.request.url, root)
            })
            .ok_or_else(missing)
    }

    /// Time until the first byte of the root document arrived: every phase
    /// before `receive`, or the whole request when no breakdown was recorded
    pub fn time_to_first_byte(&self) -> Result<f64> {
        let entry = self.actual_page()?;
        Ok(match &entry.timings {
            Some(timings) => timings.before_receive(),
            None => entry.duration_ms(),
        })
    }

    /// Full elapsed time of the root document request
    pub fn initial_load_time(&self) -> Result<f64> {
        Ok(self.actual_page()?.duration_ms())
    }

    /// Body size of the root document
    pub fn page_size(&self) -> Result<u64> {
        Ok(self.actual_page()?.size())
    }

    pub fn total_page_size(&self) -> u64 {
        total_size(&self.entries)
    }

    pub fn total_size(&self, category: AssetCategory) -> u64 {
        total_size(self.files(category))
    }

    pub fn total_image_size(&self) -> u64 {
        self.total_size(AssetCategory::Image)
    }

    pub fn total_css_size(&self) -> u64 {
        self.total_size(AssetCategory::Css)
    }

    pub fn total_js_size(&self) -> u64 {
        self.total_size(AssetCategory::Js)
    }

    pub fn total_audio_size(&self) -> u64 {
        self.total_size(AssetCategory::Audio)
    }

    pub fn total_video_size(&self) -> u64 {
        self.total_size(AssetCategory::Video)
    }

    pub fn total_text_size(&self) -> u64 {
        self.total_size(AssetCategory::Text)
    }

    pub fn total_misc_size(&self) -> u64 {
        self.total_size(AssetCategory::Misc)
    }

    /// Bytes transferred over the wire, headers included
    pub fn total_transfer_size(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.response.transfer_size())
            .fold(0, u64::saturating_add)
    }

    /// Wall-clock load time of one category
    pub fn load_time(&self, category: AssetCategory) -> Result<f64> {
        LoadTimeAnalyzer::default().load_time(self.files(category))
    }

    /// Wall-clock time spent receiving one category's bodies
    pub fn receive_time(&self, category: AssetCategory) -> Result<f64> {
        LoadTimeAnalyzer::default()
            .with_phase(LoadPhase::Receive)
            .load_time(self.files(category))
    }

    pub fn image_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Image)
    }

    pub fn css_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Css)
    }

    pub fn js_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Js)
    }

    pub fn audio_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Audio)
    }

    pub fn video_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Video)
    }

    pub fn text_load_time(&self) -> Result<f64> {
        self.load_time(AssetCategory::Text)
    }

    pub fn html_load_time(&self) -> Result<f64> {
        LoadTimeAnalyzer::default().load_time(self.html_files())
    }

    /// Wall-clock load time of every entry on the page
    pub fn total_load_time(&self) -> Result<f64> {
        LoadTimeAnalyzer::default().load_time(&self.entries)
    }

    // "total" spans the whole category; the reducer is still overlap-merge

    pub fn total_image_load_time(&self) -> Result<f64> {
        self.image_load_time()
    }

    pub fn total_css_load_time(&self) -> Result<f64> {
        self.css_load_time()
    }

    pub fn total_js_load_time(&self) -> Result<f64> {
        self.js_load_time()
    }

    pub fn total_audio_load_time(&self) -> Result<f64> {
        self.audio_load_time()
    }

    pub fn total_video_load_time(&self) -> Result<f64> {
        self.video_load_time()
    }

    pub fn total_text_load_time(&self) -> Result<f64> {
        self.text_load_time()
    }

    pub fn total_html_load_time(&self) -> Result<f64> {
        self.html_load_time()
    }

    /// Sum of every entry's time, as if nothing ran in parallel
    pub fn serial_load_time(&self) -> f64 {
        self.entries.iter().map(Entry::duration_ms).sum()
    }

    /// Wall-clock time during which any response body was being received
    pub fn content_load_time(&self) -> Result<f64> {
        LoadTimeAnalyzer::default()
            .with_phase(LoadPhase::Receive)
            .load_time(&self.entries)
    }

    /// `onContentLoad` as recorded by the browser
    pub fn on_content_load(&self) -> Option<f64> {
        self.page_timings.on_content_load.filter(|ms| *ms >= 0.0)
    }

    /// `onLoad` as recorded by the browser
    pub fn on_load(&self) -> Option<f64> {
        self.page_timings.on_load.filter(|ms| *ms >= 0.0)
    }
}

fn method_filter(pattern: &Regex) -> EntryFilter {
    EntryFilter {
        request_type: Some(pattern.clone()),
        ..EntryFilter::default()
    }
}

fn content_filter(pattern: &Regex) -> EntryFilter {
    EntryFilter {
        content_type: Some(pattern.clone()),
        ..EntryFilter::default()
    }
}

fn total_size<'a, I>(entries: I) -> u64
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries.into_iter().map(Entry::size).fold(0, u64::saturating_add)
}

/// Literal match first, then compare normalized URLs so `http://a.b`
/// equals `http://a.b/`
fn same_url(candidate: &str, root: &str) -> bool {
    if candidate == root {
        return true;
    }
    match (Url::parse(candidate), Url::parse(root)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests;
