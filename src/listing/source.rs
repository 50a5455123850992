//! The asset listing's paging profile.

use serde::Deserialize;

use crate::asset::AssetRecord;
use crate::constants::LISTING_FORMAT;
use crate::error::{Error, Result};
use crate::paging::{Page, PageFetcher, PageMeta, PageParams, Paginator, PagingProfile, Query};

/// Paged source of asset records.
pub type PagedAssetSource<F> = Paginator<AssetRecord, F>;

/// Build a paged asset source over a fetcher.
pub fn paged_asset_source<F: PageFetcher>(fetcher: F) -> PagedAssetSource<F> {
    Paginator::new(fetcher, asset_profile())
}

/// Query mapping and response parsing for the asset listing endpoint.
#[must_use]
pub fn asset_profile() -> PagingProfile<AssetRecord> {
    PagingProfile {
        query: asset_query,
        parse: parse_listing,
    }
}

fn asset_query(params: &PageParams) -> Query {
    vec![
        ("page", params.page.to_string()),
        ("page_size", params.page_size.to_string()),
        ("sort", params.sort_field.clone()),
        ("direction", params.direction.as_str().to_string()),
        ("asset_type", params.filter.clone()),
        ("format", LISTING_FORMAT.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingResponse {
    total_count: usize,
    start: usize,
    page: usize,
    page_size: usize,
    assets: Vec<AssetRecord>,
}

fn parse_listing(body: serde_json::Value) -> Result<Page<AssetRecord>> {
    let response: ListingResponse = serde_json::from_value(body).map_err(Error::malformed)?;
    if response.page_size == 0 {
        return Err(Error::malformed("pageSize must be positive"));
    }
    if response.page.checked_add(1).is_none()
        || response.start.checked_add(response.assets.len()).is_none()
    {
        return Err(Error::malformed("page or start out of range"));
    }
    Ok(Page {
        meta: PageMeta::new(
            response.total_count,
            response.start,
            response.page,
            response.page_size,
        ),
        items: response.assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::Direction;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recorder {
        body: serde_json::Value,
        seen: Mutex<Vec<Query>>,
    }

    #[async_trait]
    impl PageFetcher for Recorder {
        async fn get_json(&self, query: &[(&'static str, String)]) -> Result<serde_json::Value> {
            self.seen.lock().unwrap().push(query.to_vec());
            Ok(self.body.clone())
        }
    }

    fn asset(name: &str) -> serde_json::Value {
        serde_json::json!({
            "display_name": name,
            "date_added": "Jun 01, 2013 at 10:30 UTC",
            "url": format!("/c4x/org/class/asset/{name}"),
            "portable_url": format!("/static/{name}"),
            "thumbnail": null,
            "locked": false
        })
    }

    fn params() -> PageParams {
        PageParams {
            page: 1,
            page_size: 2,
            sort_field: "display_name".to_string(),
            direction: Direction::Asc,
            filter: String::new(),
        }
    }

    #[tokio::test]
    async fn test_fetch_serializes_query_and_parses_page() {
        let fetcher = Recorder {
            body: serde_json::json!({
                "totalCount": 3,
                "start": 2,
                "page": 1,
                "pageSize": 2,
                "assets": [asset("c.txt")]
            }),
            seen: Mutex::new(Vec::new()),
        };
        let source = paged_asset_source(fetcher);

        let page = source.fetch(&params()).await.unwrap();
        assert_eq!(page.meta.total_count, 3);
        assert_eq!(page.meta.start, 2);
        assert_eq!(page.meta.current_page, 1);
        assert_eq!(page.meta.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].display_name, "c.txt");

        let seen = source.fetcher().seen.lock().unwrap();
        assert_eq!(
            seen[0],
            vec![
                ("page", "1".to_string()),
                ("page_size", "2".to_string()),
                ("sort", "display_name".to_string()),
                ("direction", "asc".to_string()),
                ("asset_type", String::new()),
                ("format", "json".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = parse_listing(serde_json::json!({
            "totalCount": 0, "start": 0, "page": 0, "pageSize": 50, "assets": []
        }))
        .unwrap();
        assert_eq!(page.meta.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_preserves_server_order() {
        let page = parse_listing(serde_json::json!({
            "totalCount": 3, "start": 0, "page": 0, "pageSize": 50,
            "assets": [asset("b.png"), asset("a.png"), asset("c.png")]
        }))
        .unwrap();
        let names: Vec<_> = page.items.iter().map(|a| a.display_name.as_str()).collect();
        assert_eq!(names, ["b.png", "a.png", "c.png"]);
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let err = parse_listing(serde_json::json!({ "assets": [] })).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_page_beyond_usize_is_malformed() {
        let err = parse_listing(serde_json::json!({
            "totalCount": 3, "start": 0, "page": u64::MAX, "pageSize": 2,
            "assets": [asset("a.txt")]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));

        let err = parse_listing(serde_json::json!({
            "totalCount": 3, "start": u64::MAX, "page": 0, "pageSize": 2,
            "assets": [asset("a.txt")]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn test_zero_page_size_is_malformed() {
        let err = parse_listing(serde_json::json!({
            "totalCount": 0, "start": 0, "page": 0, "pageSize": 0, "assets": []
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}
