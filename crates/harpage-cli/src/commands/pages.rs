use super::csv_field;
use crate::OutputFormat;
use anyhow::Result;
use harpage_core::har::{HarParser, HarReader};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub title: Option<String>,
    pub entries: usize,
}

/// Pages recorded in a HAR file, in document order
pub fn list_pages(file: &Path) -> Result<Vec<PageSummary>> {
    let parser = HarParser::from_file(file)?;
    HarReader::validate(parser.har())?;

    let pages = parser
        .page_ids()
        .into_iter()
        .map(|id| PageSummary {
            id: id.to_string(),
            title: parser.page_info(id).map(|p| p.title.clone()),
            entries: parser.entries_for(id).len(),
        })
        .collect();

    Ok(pages)
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::debug!("Listing pages in {}", file.display());

    let pages = list_pages(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&pages)?),
        OutputFormat::Table => {
            println!("Page,Entries,URL");
            for page in &pages {
                println!(
                    "{},{},{}",
                    csv_field(&page.id),
                    page.entries,
                    csv_field(page.title.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Pretty => {
            use console::style;

            if pages.is_empty() {
                println!("{}", style("No pages found").yellow());
            }
            for page in &pages {
                println!(
                    "{:<12} {:>4} entries  {}",
                    style(&page.id).bold(),
                    page.entries,
                    page.title.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
