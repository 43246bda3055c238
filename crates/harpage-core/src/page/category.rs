use crate::har::Entry;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Content category of an entry, derived from its `Content-Type` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Image,
    Css,
    Js,
    Audio,
    Video,
    Text,
    Misc,
}

impl AssetCategory {
    /// Every category, in classification order
    pub const ALL: [AssetCategory; 7] = [
        AssetCategory::Image,
        AssetCategory::Css,
        AssetCategory::Js,
        AssetCategory::Audio,
        AssetCategory::Video,
        AssetCategory::Text,
        AssetCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Image => "image",
            AssetCategory::Css => "css",
            AssetCategory::Js => "js",
            AssetCategory::Audio => "audio",
            AssetCategory::Video => "video",
            AssetCategory::Text => "text",
            AssetCategory::Misc => "misc",
        }
    }

    /// Content-Type substrings that select this category. `Misc` has none:
    /// it is whatever the other categories leave over.
    pub fn substrings(&self) -> &'static [&'static str] {
        match self {
            AssetCategory::Image => &["image"],
            AssetCategory::Css => &["css"],
            AssetCategory::Js => &["javascript"],
            AssetCategory::Audio => &["audio"],
            AssetCategory::Video => &["video", "flash"],
            AssetCategory::Text => &["text"],
            AssetCategory::Misc => &[],
        }
    }

    /// Classify a Content-Type value; the first matching category wins
    pub fn classify(content_type: Option<&str>) -> AssetCategory {
        let Some(content_type) = content_type else {
            return AssetCategory::Misc;
        };

        CATEGORY_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(content_type))
            .map_or(AssetCategory::Misc, |(category, _)| *category)
    }

    pub fn of(entry: &Entry) -> AssetCategory {
        Self::classify(entry.content_type())
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

lazy_static! {
    static ref CATEGORY_PATTERNS: Vec<(AssetCategory, Regex)> = AssetCategory::ALL
        .iter()
        .filter(|category| !category.substrings().is_empty())
        .map(|category| {
            let union = category
                .substrings()
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            (*category, Regex::new(&union).unwrap())
        })
        .collect();
}
