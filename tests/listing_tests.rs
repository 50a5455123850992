//! Listing integration tests.
//!
//! Drives the asset list controller against the in-process server:
//! - Query parameters on the wire
//! - Sorting, filtering and paging
//! - Failure handling and empty states
//! - Delete and lock round trips

#[path = "common.rs"]
mod common;

use assetlib::Error;
use assetlib::listing::{
    Applied, AssetListController, ListingDriver, NAME_COLUMN, SortFilterState, paged_asset_source,
};
use assetlib::paging::PageFetcher;
use assetlib::ui::NoLoading;
use assetlib::ui::terminal::TableRenderer;
use common::{Events, TestServer, Views, asset_id};

type Controller = AssetListController<Views, NoLoading, Events>;

fn controller(page_size: usize) -> Controller {
    AssetListController::new(
        SortFilterState::for_assets(page_size),
        Views::default(),
        NoLoading,
        Events::default(),
    )
    .with_course("course-v1:org+class+run")
}

async fn server() -> TestServer {
    TestServer::builder()
        .with_assets(&["b.png", "notes.txt", "a.pdf", "c.jpg", "readme"])
        .start()
        .await
        .expect("Failed to start test server")
}

// =============================================================================
// Fetching
// =============================================================================

#[tokio::test]
async fn test_harness_serves_newest_first() {
    let server = server().await;
    assert_eq!(
        common::first_page_names(&server).await,
        ["b.png", "notes.txt", "a.pdf", "c.jpg", "readme"]
    );
}

#[tokio::test]
async fn test_first_page_sends_expected_query() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    driver.submit(c.start());
    assert_eq!(driver.drain(&mut c).await, [Applied::Rendered]);

    let requests = server.requests_with_method("GET");
    assert_eq!(requests.len(), 1);
    let q = &requests[0].query;
    assert_eq!(q["page"], "0");
    assert_eq!(q["page_size"], "2");
    assert_eq!(q["sort"], "date_added");
    assert_eq!(q["direction"], "desc");
    assert_eq!(q["asset_type"], "");
    assert_eq!(q["format"], "json");

    let view = c.renderer().last();
    assert_eq!(c.renderer().names(), ["b.png", "notes.txt"]);
    assert_eq!(view.total_count, 5);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.range, Some((1, 2)));
    assert_eq!(view.rows[0].asset_type, "PNG");
    assert_eq!(view.rows[0].date_added, "Mar 09, 2024 at 12:00 UTC");
}

#[tokio::test]
async fn test_sort_by_name_then_flip() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(50);

    driver.submit(c.toggle_sort(NAME_COLUMN).unwrap());
    driver.drain(&mut c).await;
    assert_eq!(
        c.renderer().names(),
        ["a.pdf", "b.png", "c.jpg", "notes.txt", "readme"]
    );

    driver.submit(c.toggle_sort(NAME_COLUMN).unwrap());
    driver.drain(&mut c).await;
    assert_eq!(
        c.renderer().names(),
        ["readme", "notes.txt", "c.jpg", "b.png", "a.pdf"]
    );
}

#[tokio::test]
async fn test_concurrent_tickets_keep_latest() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(50);

    driver.submit(c.start());
    driver.submit(c.select_filter("Images"));
    let applied = driver.drain(&mut c).await;

    assert_eq!(applied.len(), 2);
    assert_eq!(
        applied.iter().filter(|a| **a == Applied::Rendered).count(),
        1
    );
    assert_eq!(c.renderer().names(), ["b.png", "c.jpg"]);
    assert!(c.renderer().last().filtered);
}

#[tokio::test]
async fn test_filter_without_matches_shows_empty_state() {
    let server = TestServer::builder()
        .with_assets(&["a.pdf", "b.txt"])
        .start()
        .await
        .expect("Failed to start test server");
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(50);

    driver.submit(c.select_filter("Images"));
    driver.drain(&mut c).await;

    let view = c.renderer().last();
    assert!(!view.has_assets);
    assert!(view.filtered);
    assert_eq!(view.total_pages, 1);
    assert_eq!(server.requests()[0].query["asset_type"], "Images");
}

#[tokio::test]
async fn test_out_of_range_page_is_not_clamped() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    driver.submit(c.set_page(10));
    driver.drain(&mut c).await;

    assert_eq!(server.requests()[0].query["page"], "10");
    let view = c.renderer().last();
    assert!(!view.has_assets);
    assert_eq!(view.total_pages, 3);
    assert!(!view.can_next);
}

#[tokio::test]
async fn test_server_error_keeps_previous_rows() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    driver.submit(c.start());
    driver.drain(&mut c).await;
    server.fail_listing(500);

    driver.submit(c.next_page().unwrap());
    assert_eq!(driver.drain(&mut c).await, [Applied::Failed]);
    assert_eq!(c.renderer().names(), ["b.png", "notes.txt"]);
    assert_eq!(c.renderer().0.len(), 1);
}

#[tokio::test]
async fn test_fetcher_reports_status_and_bad_json() {
    let server = server().await;
    server.fail_listing(503);
    let err = server.client().get_json(&[]).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_table_renderer_prints_page() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = AssetListController::new(
        SortFilterState::for_assets(2),
        TableRenderer::quiet(),
        NoLoading,
        Events::default(),
    );

    driver.submit(c.start());
    driver.drain(&mut c).await;

    let text = c.renderer().last();
    assert!(text.contains("b.png"));
    assert!(text.contains("/static/notes.txt"));
    assert!(text.contains("Showing 1-2 of 5 (page 1 of 3)"));
}

// =============================================================================
// Delete and lock
// =============================================================================

#[tokio::test]
async fn test_delete_then_refetch_current_page() {
    let server = server().await;
    let client = server.client();
    let source = paged_asset_source(client.clone());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    driver.submit(c.start());
    driver.drain(&mut c).await;

    let id = asset_id("notes.txt");
    client.delete(&id).await.unwrap();
    driver.submit(c.on_deleted(&id));
    driver.drain(&mut c).await;

    assert_eq!(c.renderer().names(), ["b.png", "a.pdf"]);
    assert_eq!(c.renderer().last().total_count, 4);
    let deletes = server.requests_with_method("DELETE");
    assert_eq!(deletes[0].path, format!("/assets/course/{id}"));

    let (event, props) = c.analytics().0.last().unwrap();
    assert_eq!(event, "Deleted Asset");
    assert_eq!(props["course"], "course-v1:org+class+run");
}

#[tokio::test]
async fn test_delete_unknown_asset_reports_server_message() {
    let server = server().await;
    let err = server.client().delete("missing").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(err.to_string(), "Asset not found");
}

#[tokio::test]
async fn test_lock_updates_row() {
    let server = server().await;
    let client = server.client();
    let source = paged_asset_source(client.clone());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(50);

    driver.submit(c.start());
    driver.drain(&mut c).await;

    let record = c.rows()[2].clone();
    assert_eq!(record.display_name, "a.pdf");
    let updated = client.set_locked(&record, true).await.unwrap();
    assert!(updated.locked);
    c.on_lock_changed(updated);

    assert!(c.renderer().last().rows[2].locked);
    assert_eq!(server.asset(&asset_id("a.pdf")).unwrap()["locked"], true);

    let posts = server.requests_with_method("POST");
    assert_eq!(posts[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_find_asset_walks_pages() {
    let server = server().await;
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    let found = driver.find_asset(&mut c, &asset_id("readme")).await.unwrap();
    assert_eq!(found.unwrap().display_name, "readme");
    let pages: Vec<_> = server
        .requests_with_method("GET")
        .iter()
        .map(|r| r.query["page"].clone())
        .collect();
    assert_eq!(pages, ["0", "1", "2"]);
    assert_eq!(c.renderer().names(), ["readme"]);
}

#[tokio::test]
async fn test_find_asset_stops_when_server_repeats_first_page() {
    let server = server().await;
    server.ignore_paging();
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    let found = driver.find_asset(&mut c, &asset_id("readme")).await.unwrap();
    assert!(found.is_none());
    assert_eq!(server.requests_with_method("GET").len(), 3);
}

#[tokio::test]
async fn test_find_asset_reports_failed_page() {
    let server = server().await;
    server.fail_listing(500);
    let source = paged_asset_source(server.client());
    let mut driver = ListingDriver::new(&source);
    let mut c = controller(2);

    let err = driver.find_asset(&mut c, "anything").await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
}
