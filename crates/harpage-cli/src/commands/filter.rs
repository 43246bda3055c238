use super::csv_field;
use crate::OutputFormat;
use anyhow::Result;
use harpage_core::har::HarParser;
use harpage_core::{EntryFilter, HarPage, TimingModel};
use serde::Serialize;
use std::path::Path;

/// Regex criteria as given on the command line
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub method: Option<String>,
    pub content_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilteredEntry {
    pub started: String,
    pub method: String,
    pub status: i64,
    pub content_type: Option<String>,
    pub size: u64,
    pub time: f64,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    pub page_id: String,
    pub serial: bool,
    pub load_time: f64,
    pub entries: Vec<FilteredEntry>,
}

/// Select a page's entries matching `criteria` and time them
pub fn filter_page(
    file: &Path,
    page_id: &str,
    criteria: &Criteria,
    serial: bool,
) -> Result<FilterResult> {
    let filter = EntryFilter::from_patterns(
        criteria.method.as_deref(),
        criteria.content_type.as_deref(),
        criteria.status.as_deref(),
    )?;
    if filter.is_empty() {
        tracing::debug!("No criteria given, every entry matches");
    }

    tracing::debug!("Reading HAR file: {}", file.display());
    let parser = HarParser::from_file(file)?;
    let page = HarPage::builder(page_id).with_parser(&parser).build()?;

    let model = if serial {
        TimingModel::Serial
    } else {
        TimingModel::Overlap
    };
    let load_time = page.get_load_time(&filter, model)?;

    let entries = page
        .filter_entries(&filter)
        .into_iter()
        .map(|e| FilteredEntry {
            started: e.started_date_time.clone(),
            method: e.request.method.clone(),
            status: e.response.status,
            content_type: e.content_type().map(str::to_string),
            size: e.size(),
            time: e.time,
            url: e.request.url.clone(),
        })
        .collect::<Vec<_>>();

    tracing::debug!("{} of {} entries matched", entries.len(), page.entries().len());

    Ok(FilterResult {
        page_id: page_id.to_string(),
        serial,
        load_time,
        entries,
    })
}

pub fn execute(
    file: &Path,
    page_id: &str,
    criteria: Criteria,
    serial: bool,
    format: OutputFormat,
) -> Result<()> {
    let result = filter_page(file, page_id, &criteria, serial)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => {
            println!("Started,Method,Status,Content-Type,Size,Time,URL");
            for e in &result.entries {
                println!(
                    "{},{},{},{},{},{:.2},{}",
                    e.started,
                    e.method,
                    e.status,
                    csv_field(e.content_type.as_deref().unwrap_or("")),
                    e.size,
                    e.time,
                    csv_field(&e.url)
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            for e in &result.entries {
                println!(
                    "  {} {} [{:.2} ms, {} bytes] {}",
                    style(&e.method).bold(),
                    e.status,
                    e.time,
                    e.size,
                    e.url
                );
            }
            let model = if result.serial { "serial" } else { "parallel" };
            println!(
                "\n{} {} entries, {:.2} ms ({})",
                style("Matched:").bold(),
                result.entries.len(),
                result.load_time,
                model
            );
        }
    }

    Ok(())
}
