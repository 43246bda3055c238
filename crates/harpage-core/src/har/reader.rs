use super::types::Har;
use crate::{Error, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let har: Har = serde_json::from_reader(reader)?;

        tracing::info!(
            "Parsed HAR file with {} pages and {} entries",
            har.log.pages.as_ref().map_or(0, Vec::len),
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");

        let har: Har = serde_json::from_str(content)?;
        Ok(har)
    }

    /// Convert an already-deserialized JSON document into a HAR
    pub fn from_value(value: serde_json::Value) -> Result<Har> {
        tracing::debug!("Converting parsed JSON document into HAR");

        let har: Har = serde_json::from_value(value)?;
        Ok(har)
    }

    /// Check the fields page analysis depends on: a version, a method and
    /// URL per entry, and offset-aware start timestamps.
    ///
    /// Entries pointing at a page the log does not declare are logged, not
    /// rejected; they stay reachable through their `pageref`.
    pub fn validate(har: &Har) -> Result<()> {
        tracing::debug!("Validating HAR structure");

        if har.log.version.is_empty() {
            return Err(Error::InvalidStructure("Missing HAR version".to_string()));
        }

        if har.log.entries.is_empty() {
            tracing::warn!("HAR file contains no entries");
        }

        let declared: HashSet<&str> = har
            .log
            .pages
            .iter()
            .flatten()
            .map(|p| p.id.as_str())
            .collect();

        for (idx, entry) in har.log.entries.iter().enumerate() {
            if entry.request.method.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request method",
                    idx
                )));
            }
            if entry.request.url.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request URL",
                    idx
                )));
            }
            entry.started_at()?;

            if let Some(page_ref) = entry.page_ref.as_deref() {
                if !declared.contains(page_ref) {
                    tracing::warn!("Entry {} references undeclared page {}", idx, page_ref);
                }
            }
        }

        Ok(())
    }
}
