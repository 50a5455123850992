//! View model handed to [`crate::ui::AssetListRenderer`].

use crate::asset::{AssetRecord, Category, TypeFilterTable};
use crate::paging::{Direction, PageMeta};

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRow {
    pub id: String,
    pub name: String,
    pub asset_type: String,
    pub category: Category,
    pub date_added: String,
    pub locked: bool,
    pub portable_url: String,
    pub url: String,
}

impl AssetRow {
    pub(crate) fn from_record(record: &AssetRecord, types: &TypeFilterTable) -> Self {
        let asset_type = record.asset_type();
        Self {
            id: record.key().to_string(),
            name: record.display_name.clone(),
            category: types.classify(&asset_type),
            asset_type,
            date_added: record.date_added_display(),
            locked: record.locked,
            portable_url: record.portable_url.clone(),
            url: record.url.clone(),
        }
    }
}

/// Everything a renderer needs to draw the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub rows: Vec<AssetRow>,
    /// False renders the "no assets" state instead of the table.
    pub has_assets: bool,
    /// Whether a type filter is active.
    pub filtered: bool,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub can_prev: bool,
    pub can_next: bool,
    /// 1-based inclusive row range on this page, if any rows.
    pub range: Option<(usize, usize)>,
    pub sort_label: String,
    pub direction: Direction,
    pub filter_label: String,
}

impl ListingView {
    pub(crate) fn build(
        rows: Vec<AssetRow>,
        meta: &PageMeta,
        filtered: bool,
        sort_label: String,
        direction: Direction,
        filter_label: String,
    ) -> Self {
        let range = (!rows.is_empty()).then(|| {
            (
                meta.start.saturating_add(1),
                meta.start.saturating_add(rows.len()),
            )
        });
        Self {
            has_assets: !rows.is_empty(),
            filtered,
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_count: meta.total_count,
            can_prev: meta.current_page > 0,
            can_next: meta.current_page.saturating_add(1) < meta.total_pages,
            range,
            sort_label,
            direction,
            filter_label,
            rows,
        }
    }
}
