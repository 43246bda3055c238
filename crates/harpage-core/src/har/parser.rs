use super::reader::HarReader;
use super::types::{Creator, Entry, Har, Log, Page};
use crate::Result;
use crate::page::HarPage;
use std::path::Path;

/// Page id that collects entries recorded without a `pageref`
pub const UNKNOWN_PAGE_ID: &str = "unknown";

/// Archive-level view of a HAR document: which pages it holds and which
/// entries belong to each.
#[derive(Debug, Clone)]
pub struct HarParser {
    har: Har,
}

impl HarParser {
    pub fn new(har: Har) -> Self {
        Self { har }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        HarReader::from_file(path).map(Self::new)
    }

    pub fn har(&self) -> &Har {
        &self.har
    }

    pub fn version(&self) -> &str {
        &self.har.log.version
    }

    pub fn creator(&self) -> &Creator {
        &self.har.log.creator
    }

    pub fn browser(&self) -> Option<&Creator> {
        self.har.log.browser.as_ref()
    }

    /// Page ids in document order, followed by [`UNKNOWN_PAGE_ID`] when
    /// some entries carry no `pageref`
    pub fn page_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = pages(&self.har.log).iter().map(|p| p.id.as_str()).collect();
        if has_orphans(&self.har.log) && !ids.contains(&UNKNOWN_PAGE_ID) {
            ids.push(UNKNOWN_PAGE_ID);
        }
        ids
    }

    pub fn page_info(&self, page_id: &str) -> Option<&Page> {
        page_info(&self.har.log, page_id)
    }

    /// Entries belonging to `page_id`, in document order
    pub fn entries_for(&self, page_id: &str) -> Vec<&Entry> {
        entries_for(&self.har.log, page_id)
    }

    /// Build every page in the archive
    pub fn pages(&self) -> Result<Vec<HarPage>> {
        self.page_ids()
            .into_iter()
            .map(|id| HarPage::builder(id).with_parser(self).build())
            .collect()
    }
}

pub(crate) fn page_info<'a>(log: &'a Log, page_id: &str) -> Option<&'a Page> {
    pages(log).iter().find(|p| p.id == page_id)
}

pub(crate) fn entries_for<'a>(log: &'a Log, page_id: &str) -> Vec<&'a Entry> {
    log.entries
        .iter()
        .filter(|entry| match entry.page_ref.as_deref() {
            Some(page_ref) => page_ref == page_id,
            None => page_id == UNKNOWN_PAGE_ID,
        })
        .collect()
}

pub(crate) fn has_orphans(log: &Log) -> bool {
    log.entries.iter().any(|entry| entry.page_ref.is_none())
}

fn pages(log: &Log) -> &[Page] {
    log.pages.as_deref().unwrap_or_default()
}
