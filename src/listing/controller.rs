//! Asset list controller.
//!
//! Owns the listing's sort/filter state and the rows currently on display.
//! User-triggered methods mutate state synchronously and return a
//! [`FetchTicket`]; whoever executes the ticket hands the outcome back to
//! [`AssetListController::apply_fetch`]. Each ticket carries a sequence
//! number and only the most recently issued one is ever applied, so a slow
//! response can never overwrite a newer one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::asset::{AssetRecord, TypeFilterTable};
use crate::constants::{EVENT_DELETED_ASSET, EVENT_UPLOADED_FILE};
use crate::error::Result;
use crate::paging::{Page, PageMeta, PageParams};
use crate::ui::{Analytics, AssetListRenderer, LoadingIndicator, Passthrough, Translate};

use super::state::SortFilterState;
use super::view::{AssetRow, ListingView};

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    params: PageParams,
}

impl FetchTicket {
    /// Issue order; higher is newer.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn params(&self) -> &PageParams {
        &self.params
    }
}

/// What [`AssetListController::apply_fetch`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Rows replaced and re-rendered.
    Rendered,
    /// Fetch failed; previous rows kept.
    Failed,
    /// A newer ticket was issued; result discarded.
    Stale,
}

/// Receives newly uploaded assets.
///
/// The upload controller is handed one of these per call instead of
/// reaching for a shared list.
pub trait AssetSink {
    /// Show a new asset and return the fetch that refreshes the list.
    fn add_asset(&mut self, record: AssetRecord) -> FetchTicket;
}

/// Orchestrates sort/filter state, fetch tickets and rendering.
pub struct AssetListController<R, L, A> {
    state: SortFilterState,
    rows: Vec<AssetRecord>,
    meta: PageMeta,
    latest_seq: u64,
    types: TypeFilterTable,
    course: Option<String>,
    i18n: Arc<dyn Translate>,
    renderer: R,
    loading: L,
    analytics: A,
}

impl<R, L, A> AssetListController<R, L, A>
where
    R: AssetListRenderer,
    L: LoadingIndicator,
    A: Analytics,
{
    pub fn new(state: SortFilterState, renderer: R, loading: L, analytics: A) -> Self {
        let meta = PageMeta::new(0, 0, 0, state.page_size());
        Self {
            state,
            rows: Vec::new(),
            meta,
            latest_seq: 0,
            types: TypeFilterTable::default(),
            course: None,
            i18n: Arc::new(Passthrough),
            renderer,
            loading,
            analytics,
        }
    }

    /// Use a custom extension table for row categories.
    #[must_use]
    pub fn with_types(mut self, types: TypeFilterTable) -> Self {
        self.types = types;
        self
    }

    /// Course identifier attached to analytics events.
    #[must_use]
    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    #[must_use]
    pub fn with_translator(mut self, i18n: Arc<dyn Translate>) -> Self {
        self.i18n = i18n;
        self
    }

    /// Initial load of the first page.
    pub fn start(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Sort by a column, or flip direction if it is already active.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownColumn`] for an unregistered column; no
    /// fetch is issued.
    pub fn toggle_sort(&mut self, column: &str) -> Result<FetchTicket> {
        self.state.toggle_sort(column)?;
        Ok(self.issue())
    }

    /// Select a type filter (`ALL` clears it).
    pub fn select_filter(&mut self, value: &str) -> FetchTicket {
        self.state.select_filter(value);
        self.issue()
    }

    /// Jump to a page.
    pub fn set_page(&mut self, page: usize) -> FetchTicket {
        self.state.set_page(page);
        self.issue()
    }

    /// Next page, unless the displayed page is the last.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let page = self.meta.current_page.saturating_add(1);
        (page < self.meta.total_pages).then(|| self.set_page(page))
    }

    /// Previous page, unless the displayed page is the first.
    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        let page = self.meta.current_page.checked_sub(1)?;
        Some(self.set_page(page))
    }

    /// Re-request the current parameters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue()
    }

    /// Apply the outcome of a fetch.
    ///
    /// Results for anything but the latest ticket are discarded. A failure
    /// hides the loading indicator and leaves the displayed rows alone.
    pub fn apply_fetch(&mut self, ticket: &FetchTicket, result: Result<Page<AssetRecord>>) -> Applied {
        if ticket.seq != self.latest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "Discarding stale listing response"
            );
            return Applied::Stale;
        }

        self.loading.hide();
        match result {
            Ok(page) => {
                debug!(
                    seq = ticket.seq,
                    rows = page.items.len(),
                    total = page.meta.total_count,
                    "Applying listing page"
                );
                self.rows = page.items;
                self.meta = page.meta;
                self.render();
                Applied::Rendered
            },
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "Listing fetch failed, keeping previous rows");
                Applied::Failed
            },
        }
    }

    /// A delete completed: track it and re-fetch the current page.
    pub fn on_deleted(&mut self, asset_id: &str) -> FetchTicket {
        let properties = self.event_properties("id", asset_id);
        self.analytics.track(EVENT_DELETED_ASSET, properties);
        self.issue()
    }

    /// A lock toggle completed: swap in the server's copy of the row.
    pub fn on_lock_changed(&mut self, record: AssetRecord) {
        let Some(row) = self.rows.iter_mut().find(|r| r.key() == record.key()) else {
            debug!(asset = %record.key(), "Lock change for an asset not on this page");
            return;
        };
        *row = record;
        self.render();
    }

    /// Current view model.
    #[must_use]
    pub fn view(&self) -> ListingView {
        let rows = self
            .rows
            .iter()
            .map(|r| AssetRow::from_record(r, &self.types))
            .collect();
        let filter_label = if self.state.is_filtered() {
            self.state.filter_label().to_string()
        } else {
            self.i18n.t(self.state.filter_label())
        };
        ListingView::build(
            rows,
            &self.meta,
            self.state.is_filtered(),
            self.i18n.t(&self.state.active_column().label),
            self.state.direction(),
            filter_label,
        )
    }

    #[must_use]
    pub fn rows(&self) -> &[AssetRecord] {
        &self.rows
    }

    #[must_use]
    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    #[must_use]
    pub fn state(&self) -> &SortFilterState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn loading(&self) -> &L {
        &self.loading
    }

    pub fn analytics(&self) -> &A {
        &self.analytics
    }

    fn issue(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        let params = self.state.params();
        debug!(
            seq = self.latest_seq,
            page = params.page,
            sort = %params.sort_field,
            direction = %params.direction,
            filter = %params.filter,
            "Issued listing fetch"
        );
        self.loading.show();
        FetchTicket {
            seq: self.latest_seq,
            params,
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }

    fn event_properties(&self, key: &str, value: &str) -> serde_json::Value {
        let mut props = serde_json::Map::new();
        if let Some(course) = &self.course {
            props.insert("course".to_string(), course.clone().into());
        }
        props.insert(key.to_string(), value.into());
        serde_json::Value::Object(props)
    }
}

impl<R, L, A> AssetSink for AssetListController<R, L, A>
where
    R: AssetListRenderer,
    L: LoadingIndicator,
    A: Analytics,
{
    /// Reset to the newest-first sort on page 0 showing only the new asset,
    /// then refresh from the server.
    ///
    /// Rows on display may belong to another page or sort order, so they
    /// are dropped rather than merged.
    fn add_asset(&mut self, record: AssetRecord) -> FetchTicket {
        self.state.reset_sort();
        self.state.set_page(0);

        let properties = self.event_properties("asset_url", &record.url);
        self.analytics.track(EVENT_UPLOADED_FILE, properties);

        self.rows = vec![record];
        self.meta = PageMeta::new(
            self.meta.total_count.saturating_add(1),
            0,
            0,
            self.state.page_size(),
        );
        self.render();
        self.issue()
    }
}
