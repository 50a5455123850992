//! Generic server-paged fetching.
//!
//! A [`Paginator`] pairs a [`PageFetcher`] (the transport) with a
//! [`PagingProfile`] (how request parameters map onto query pairs and how a
//! response body becomes a [`Page`]). Resource-specific behaviour lives
//! entirely in the profile, so the same paginator serves any listing.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sort direction as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// The opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to request one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: usize,
    pub page_size: usize,
    pub sort_field: String,
    pub direction: Direction,
    /// Type filter value; empty means no filter.
    pub filter: String,
}

/// Pagination metadata reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub total_count: usize,
    /// Offset of the first returned row.
    pub start: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PageMeta {
    /// Build metadata, deriving `total_pages`.
    #[must_use]
    pub fn new(total_count: usize, start: usize, current_page: usize, page_size: usize) -> Self {
        Self {
            total_count,
            start,
            current_page,
            page_size,
            total_pages: total_pages(total_count, page_size),
        }
    }
}

/// Number of pages for a collection. Never less than 1, so an empty
/// collection still reads "page 1 of 1".
///
/// # Examples
///
/// ```
/// use assetlib::paging::total_pages;
///
/// assert_eq!(total_pages(0, 50), 1);
/// assert_eq!(total_pages(50, 50), 1);
/// assert_eq!(total_pages(51, 50), 2);
/// ```
#[must_use]
pub fn total_pages(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_count.div_ceil(page_size).max(1)
}

/// One server page: metadata plus rows in server order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub items: Vec<T>,
}

/// Query pairs for one listing request.
pub type Query = Vec<(&'static str, String)>;

/// Resource-specific paging behaviour, supplied as data.
pub struct PagingProfile<T> {
    /// Map request parameters onto query pairs.
    pub query: fn(&PageParams) -> Query,
    /// Parse a response body into a page.
    pub parse: fn(serde_json::Value) -> Result<Page<T>>,
}

impl<T> Clone for PagingProfile<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PagingProfile<T> {}

impl<T> fmt::Debug for PagingProfile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingProfile").finish_non_exhaustive()
    }
}

/// Transport for listing requests.
///
/// Implementations perform one read request against the listing endpoint
/// and return the decoded JSON body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue the listing request with the given query pairs.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Fetch`] on transport failure or a non-success
    /// status, and [`crate::Error::MalformedResponse`] when the body is not
    /// JSON.
    async fn get_json(&self, query: &[(&'static str, String)]) -> Result<serde_json::Value>;
}

/// Generic paged source.
#[derive(Debug)]
pub struct Paginator<T, F> {
    fetcher: F,
    profile: PagingProfile<T>,
}

impl<T, F: PageFetcher> Paginator<T, F> {
    pub fn new(fetcher: F, profile: PagingProfile<T>) -> Self {
        Self { fetcher, profile }
    }

    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's error, or the profile's parse error.
    pub async fn fetch(&self, params: &PageParams) -> Result<Page<T>> {
        let query = (self.profile.query)(params);
        tracing::debug!(page = params.page, sort = %params.sort_field, direction = %params.direction, filter = %params.filter, "Fetching page");
        let body = self.fetcher.get_json(&query).await?;
        (self.profile.parse)(body)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}
