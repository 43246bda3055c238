use super::{Analyzer, CategorySize, SizeStats, from_primary_entry};
use crate::Result;
use crate::page::{AssetCategory, HarPage};

pub struct SizeAnalyzer;

impl Analyzer for SizeAnalyzer {
    type Output = SizeStats;

    fn analyze(&self, page: &HarPage) -> Result<Self::Output> {
        tracing::debug!("Analyzing sizes for page {}", page.page_id());

        let categories: Vec<CategorySize> = AssetCategory::ALL
            .iter()
            .map(|&category| CategorySize {
                category,
                count: page.files(category).len(),
                bytes: page.total_size(category),
            })
            .collect();

        let stats = SizeStats {
            page_size: from_primary_entry(page.page_size())?,
            total_size: page.total_page_size(),
            transfer_size: page.total_transfer_size(),
            categories,
        };

        tracing::info!(
            "Size analysis complete: {} bytes across {} entries",
            stats.total_size,
            page.entries().len()
        );

        Ok(stats)
    }
}
