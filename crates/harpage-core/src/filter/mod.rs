use crate::Result;
use crate::har::Entry;
use regex::Regex;

/// Regex criteria for selecting HAR entries
///
/// Every pattern uses search semantics: it may match anywhere in the target
/// string, so `ET` matches `GET` and `2` matches `200`. Anchor with `^`/`$`
/// for a full match. All set criteria are combined with AND logic.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Matched against `request.method`
    pub request_type: Option<Regex>,
    /// Matched against the `Content-Type` response header
    pub content_type: Option<Regex>,
    /// Matched against the decimal form of `response.status`
    pub status_code: Option<Regex>,
}

impl EntryFilter {
    /// Create a filter that accepts every entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from optional pattern strings
    pub fn from_patterns(
        request_type: Option<&str>,
        content_type: Option<&str>,
        status_code: Option<&str>,
    ) -> Result<Self> {
        let mut filter = Self::new();
        if let Some(pattern) = request_type {
            filter = filter.with_request_type(pattern)?;
        }
        if let Some(pattern) = content_type {
            filter = filter.with_content_type(pattern)?;
        }
        if let Some(pattern) = status_code {
            filter = filter.with_status_code(pattern)?;
        }
        Ok(filter)
    }

    pub fn with_request_type(mut self, pattern: &str) -> Result<Self> {
        self.request_type = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_content_type(mut self, pattern: &str) -> Result<Self> {
        self.content_type = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_status_code(mut self, pattern: &str) -> Result<Self> {
        self.status_code = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// True when no criteria are set
    pub fn is_empty(&self) -> bool {
        self.request_type.is_none() && self.content_type.is_none() && self.status_code.is_none()
    }

    /// Check if an entry matches all filter criteria
    pub fn matches(&self, entry: &Entry) -> bool {
        self.matches_request_type(entry)
            && self.matches_content_type(entry)
            && self.matches_status_code(entry)
    }

    /// Matching entries, in the order they were given
    pub fn apply<'a, I>(&self, entries: I) -> Vec<&'a Entry>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        entries.into_iter().filter(|entry| self.matches(entry)).collect()
    }

    fn matches_request_type(&self, entry: &Entry) -> bool {
        match &self.request_type {
            None => true,
            Some(pattern) => pattern.is_match(&entry.request.method),
        }
    }

    fn matches_content_type(&self, entry: &Entry) -> bool {
        match &self.content_type {
            None => true,
            // No header means the entry cannot satisfy a content-type criterion
            Some(pattern) => entry
                .content_type()
                .is_some_and(|value| pattern.is_match(value)),
        }
    }

    fn matches_status_code(&self, entry: &Entry) -> bool {
        match &self.status_code {
            None => true,
            Some(pattern) => pattern.is_match(&entry.response.status.to_string()),
        }
    }
}

/// Select the entries matching `filter`, preserving input order
pub fn filter_entries<'a, I>(entries: I, filter: &EntryFilter) -> Vec<&'a Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    filter.apply(entries)
}
