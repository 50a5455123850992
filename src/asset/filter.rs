//! Type buckets used by the listing's type filter.
//!
//! The server does the filtering; the client only needs to know the bucket
//! names it may request and how an extension maps onto them for display.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A type bucket. `Other` collects every extension no bucket claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Images,
    Documents,
    Text,
    #[serde(rename = "OTHER")]
    Other,
}

impl Category {
    /// Buckets offered in the filter menu, in display order.
    pub const FILTERABLE: [Self; 4] = [Self::Images, Self::Documents, Self::Text, Self::Other];

    /// The value sent as `asset_type` for this bucket.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Text => "Text",
            Self::Other => "OTHER",
        }
    }

    /// Look a bucket up by its label (case-insensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::FILTERABLE
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Extension table mapping uppercased extensions onto buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFilterTable {
    buckets: BTreeMap<Category, Vec<String>>,
}

impl Default for TypeFilterTable {
    fn default() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert(
            Category::Images,
            upper(&["JPG", "JPEG", "PNG", "GIF", "TIF", "TIFF", "BMP", "SVG", "ICO"]),
        );
        buckets.insert(
            Category::Documents,
            upper(&[
                "PDF", "DOC", "DOCX", "XLS", "XLSX", "PPT", "PPTX", "ODT", "ODS", "ODP",
            ]),
        );
        buckets.insert(
            Category::Text,
            upper(&[
                "TXT", "CSV", "HTML", "HTM", "XML", "JSON", "MD", "SRT", "JS", "CSS",
            ]),
        );
        Self { buckets }
    }
}

fn upper(exts: &[&str]) -> Vec<String> {
    exts.iter().map(|e| e.to_uppercase()).collect()
}

impl TypeFilterTable {
    /// Default table with the buckets in `overrides` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a key is not a known bucket label or
    /// names the `OTHER` bucket, which is implicit.
    pub fn with_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut table = Self::default();
        for (label, exts) in overrides {
            match Category::from_label(label) {
                Some(Category::Other) => {
                    return Err(Error::Config(
                        "the OTHER bucket is implicit and cannot list extensions".to_string(),
                    ));
                },
                Some(category) => {
                    table.buckets.insert(
                        category,
                        exts.iter()
                            .map(|e| e.trim_start_matches('.').to_uppercase())
                            .collect(),
                    );
                },
                None => {
                    return Err(Error::Config(format!(
                        "unknown filter bucket '{label}' (expected Images, Documents or Text)"
                    )));
                },
            }
        }
        Ok(table)
    }

    /// Bucket for an extension as produced by [`crate::asset_type`].
    #[must_use]
    pub fn classify(&self, extension: &str) -> Category {
        if extension.is_empty() {
            return Category::Other;
        }
        let ext = extension.to_uppercase();
        self.buckets
            .iter()
            .find(|(_, exts)| exts.contains(&ext))
            .map_or(Category::Other, |(category, _)| *category)
    }

    /// Extensions claimed by a bucket. Empty for `Other`.
    #[must_use]
    pub fn extensions(&self, category: Category) -> &[String] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
