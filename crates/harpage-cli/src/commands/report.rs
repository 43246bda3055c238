use crate::OutputFormat;
use anyhow::Result;
use harpage_core::HarPage;
use harpage_core::analysis::{Analyzer, PageAnalyzer, PageReport};
use harpage_core::har::HarParser;
use std::path::Path;

/// Analyze one page of a HAR file and return structured results
pub fn analyze_page(file: &Path, page_id: &str, top_n: usize) -> Result<PageReport> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let parser = HarParser::from_file(file)?;
    let page = HarPage::builder(page_id).with_parser(&parser).build()?;

    let report = PageAnalyzer::new(top_n).analyze(&page)?;
    Ok(report)
}

pub fn execute(file: &Path, page_id: &str, top_n: usize, format: OutputFormat) -> Result<()> {
    tracing::info!("Analyzing page {} of {}", page_id, file.display());

    let report = analyze_page(file, page_id, top_n)?;

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &PageReport) {
    use console::style;

    println!("\n{}", style("HAR Page Report").bold().cyan());
    println!("{}", style("===============").cyan());

    println!("\n{}", style("Page:").bold());
    println!("  Id:                 {}", report.page_id);
    if let Some(title) = &report.title {
        println!("  URL:                {}", title);
    }
    println!(
        "  Entries:            {} ({} GET, {} POST)",
        report.total_entries, report.get_requests, report.post_requests
    );

    let sizes = &report.sizes;
    println!("\n{}", style("Sizes:").bold());
    if let Some(page_size) = sizes.page_size {
        println!("  Document:           {} bytes", page_size);
    }
    println!("  Total:              {} bytes", sizes.total_size);
    println!("  Transferred:        {} bytes", sizes.transfer_size);
    for category in &sizes.categories {
        println!(
            "  {:<20}{} bytes in {} files",
            format!("{}:", category.category),
            category.bytes,
            category.count
        );
    }

    let timings = &report.timings;
    println!("\n{}", style("Load Times:").bold());
    println!("  Page:               {:.2} ms", timings.total_load_time);
    println!("  Serial:             {:.2} ms", timings.serial_load_time);
    println!("  Content (receive):  {:.2} ms", timings.content_load_time);
    println!("  HTML:               {:.2} ms", timings.html_load_time);
    if let Some(ttfb) = timings.time_to_first_byte {
        println!("  Time to First Byte: {:.2} ms", ttfb);
    }
    if let Some(initial) = timings.initial_load_time {
        println!("  Initial Document:   {:.2} ms", initial);
    }
    if let Some(on_content_load) = timings.on_content_load {
        println!("  onContentLoad:      {:.2} ms", on_content_load);
    }
    if let Some(on_load) = timings.on_load {
        println!("  onLoad:             {:.2} ms", on_load);
    }
    for category in &timings.categories {
        println!(
            "  {:<20}{:.2} ms",
            format!("{}:", category.category),
            category.load_time
        );
    }

    if !timings.slowest_requests.is_empty() {
        println!("\n{}", style("Slowest Requests:").bold());
        for (i, req) in timings.slowest_requests.iter().enumerate() {
            println!(
                "  {}. [{:.2} ms] {} {} - {}",
                i + 1,
                req.time,
                req.method,
                req.status,
                req.url
            );
        }
    }

    println!();
}

fn output_json(report: &PageReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

fn output_table(report: &PageReport) {
    println!("Metric,Value");
    println!("Entries,{}", report.total_entries);
    if let Some(page_size) = report.sizes.page_size {
        println!("Page Size (bytes),{}", page_size);
    }
    println!("Total Size (bytes),{}", report.sizes.total_size);
    println!("Transfer Size (bytes),{}", report.sizes.transfer_size);
    for category in &report.sizes.categories {
        println!("{} Size (bytes),{}", category.category, category.bytes);
    }
    println!("Load Time (ms),{:.2}", report.timings.total_load_time);
    println!("Serial Load Time (ms),{:.2}", report.timings.serial_load_time);
    if let Some(ttfb) = report.timings.time_to_first_byte {
        println!("Time to First Byte (ms),{:.2}", ttfb);
    }
    for category in &report.timings.categories {
        println!("{} Load Time (ms),{:.2}", category.category, category.load_time);
    }
}
