//! Executes fetch tickets concurrently and feeds results back.
//!
//! Results are applied in completion order. The controller's sequence check
//! decides which one sticks, so a slow early request cannot clobber a fast
//! later one.

use futures::StreamExt;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::FuturesUnordered;

use crate::asset::AssetRecord;
use crate::error::{Error, Result};
use crate::paging::{Page, PageFetcher};
use crate::ui::{Analytics, AssetListRenderer, LoadingIndicator};

use super::controller::{Applied, AssetListController, FetchTicket};
use super::source::PagedAssetSource;

type Pending<'a> = LocalBoxFuture<'a, (FetchTicket, Result<Page<AssetRecord>>)>;

/// In-flight listing fetches.
pub struct ListingDriver<'a, F> {
    source: &'a PagedAssetSource<F>,
    pending: FuturesUnordered<Pending<'a>>,
}

impl<'a, F: PageFetcher> ListingDriver<'a, F> {
    pub fn new(source: &'a PagedAssetSource<F>) -> Self {
        Self {
            source,
            pending: FuturesUnordered::new(),
        }
    }

    /// Start executing a ticket. Nothing runs until [`Self::drain`] is polled.
    pub fn submit(&mut self, ticket: FetchTicket) {
        let source = self.source;
        self.pending.push(
            async move {
                let result = source.fetch(ticket.params()).await;
                (ticket, result)
            }
            .boxed_local(),
        );
    }

    /// Number of fetches still outstanding.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Wait for every outstanding fetch and apply each as it completes.
    pub async fn drain<R, L, A>(&mut self, controller: &mut AssetListController<R, L, A>) -> Vec<Applied>
    where
        R: AssetListRenderer,
        L: LoadingIndicator,
        A: Analytics,
    {
        let mut applied = Vec::with_capacity(self.pending.len());
        while let Some((ticket, result)) = self.pending.next().await {
            applied.push(controller.apply_fetch(&ticket, result));
        }
        applied
    }

    /// Walk the listing from the first page until an asset with `key` shows
    /// up on screen.
    ///
    /// Pages are counted here rather than read back from the server, so the
    /// walk ends after `total_pages` requests even if the server keeps
    /// answering with the same page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when a page fails to load.
    pub async fn find_asset<R, L, A>(
        &mut self,
        controller: &mut AssetListController<R, L, A>,
        key: &str,
    ) -> Result<Option<AssetRecord>>
    where
        R: AssetListRenderer,
        L: LoadingIndicator,
        A: Analytics,
    {
        let mut page = 0;
        loop {
            self.submit(controller.set_page(page));
            if self.drain(controller).await.contains(&Applied::Failed) {
                return Err(Error::fetch(format!(
                    "listing page {} could not be loaded",
                    page + 1
                )));
            }
            if let Some(record) = controller.rows().iter().find(|r| r.key() == key) {
                return Ok(Some(record.clone()));
            }
            page += 1;
            if page >= controller.meta().total_pages {
                return Ok(None);
            }
        }
    }
}
