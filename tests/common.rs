//! Shared test harness: an in-process asset endpoint.
//!
//! `TestServer` serves the listing, chunked upload, delete and lock routes
//! on `127.0.0.1:0` and records every request it sees.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use assetlib::StudioClient;
use assetlib::asset::TypeFilterTable;
use assetlib::listing::{ListingView, paged_asset_source};
use assetlib::ui::{Analytics, AssetListRenderer};

pub const ASSETS_PATH: &str = "/assets/course/";

const DATE_FORMAT: &str = "%b %d, %Y at %H:%M UTC";

/// One request as the server saw it.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub content_range: Option<String>,
    pub content_disposition: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    fn new(method: &str, path: &str, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            method: method.to_string(),
            path: path.to_string(),
            content_range: header("content-range"),
            content_disposition: header("content-disposition"),
            content_type: header("content-type"),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct ServerState {
    /// Newest first.
    assets: Vec<Value>,
    requests: Vec<Recorded>,
    listing_failure: Option<u16>,
    /// Answer every listing request with the first page.
    ignore_paging: bool,
    upload_failure: Option<(u16, String)>,
}

type Shared = Arc<Mutex<ServerState>>;

/// Builder for [`TestServer`].
#[derive(Default)]
pub struct TestServerBuilder {
    assets: Vec<String>,
}

impl TestServerBuilder {
    /// Seed assets by display name, newest first.
    pub fn with_assets(mut self, names: &[&str]) -> Self {
        self.assets = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    pub async fn start(self) -> std::io::Result<TestServer> {
        let newest = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let assets = self
            .assets
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let date = newest - Duration::hours(i64::try_from(i).unwrap());
                asset_json(name, &date.format(DATE_FORMAT).to_string())
            })
            .collect();
        let state: Shared = Arc::new(Mutex::new(ServerState {
            assets,
            ..ServerState::default()
        }));

        let app = Router::new()
            .route(ASSETS_PATH, get(list).post(upload))
            .route(&format!("{ASSETS_PATH}{{id}}"), post(lock).delete(delete))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(TestServer {
            addr,
            state,
            handle,
        })
    }
}

pub struct TestServer {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> StudioClient {
        StudioClient::new(&self.base_url(), ASSETS_PATH).expect("Failed to create client")
    }

    /// Make every listing request fail with `status`.
    pub fn fail_listing(&self, status: u16) {
        self.state.lock().unwrap().listing_failure = Some(status);
    }

    /// Ignore the requested page and always serve the first one.
    pub fn ignore_paging(&self) {
        self.state.lock().unwrap().ignore_paging = true;
    }

    /// Make every upload chunk fail with `status` and a raw body.
    pub fn fail_uploads(&self, status: u16, body: &str) {
        self.state.lock().unwrap().upload_failure = Some((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn asset_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .assets
            .iter()
            .map(|a| a["display_name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn asset(&self, id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .assets
            .iter()
            .find(|a| a["id"] == id)
            .cloned()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Asset JSON as the server renders it.
pub fn asset_json(name: &str, date_added: &str) -> Value {
    json!({
        "id": asset_id(name),
        "display_name": name,
        "date_added": date_added,
        "url": format!("/c4x/org/class/asset/{name}"),
        "external_url": format!("https://lms.example.com/c4x/org/class/asset/{name}"),
        "portable_url": format!("/static/{name}"),
        "thumbnail": null,
        "locked": false
    })
}

pub fn asset_id(name: &str) -> String {
    format!("asset-v1:org+class+run+type@asset+block@{name}")
}

async fn list(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut st = state.lock().unwrap();
    let mut recorded = Recorded::new("GET", ASSETS_PATH, &headers);
    recorded.query = query.clone();
    st.requests.push(recorded);

    if let Some(status) = st.listing_failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, "listing unavailable").into_response();
    }

    let param = |k: &str| query.get(k).cloned().unwrap_or_default();
    let page: usize = if st.ignore_paging {
        0
    } else {
        param("page").parse().unwrap_or(0)
    };
    let page_size: usize = param("page_size").parse().unwrap_or(50);
    let filter = param("asset_type");
    let types = TypeFilterTable::default();

    let mut assets: Vec<Value> = st
        .assets
        .iter()
        .filter(|a| {
            let name = a["display_name"].as_str().unwrap_or_default();
            filter.is_empty()
                || types.classify(&assetlib::asset_type(name)).label() == filter
        })
        .cloned()
        .collect();
    let ascending = param("direction") == "asc";
    if param("sort") == "display_name" {
        assets.sort_by_key(|a| a["display_name"].as_str().unwrap_or_default().to_string());
        if !ascending {
            assets.reverse();
        }
    } else if ascending {
        assets.reverse();
    }

    let start = page * page_size;
    let total = assets.len();
    let items: Vec<Value> = assets.into_iter().skip(start).take(page_size).collect();
    Json(json!({
        "totalCount": total,
        "start": start,
        "page": page,
        "pageSize": page_size,
        "assets": items,
    }))
    .into_response()
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut st = state.lock().unwrap();
    let mut recorded = Recorded::new("POST", ASSETS_PATH, &headers);
    recorded.body = body.to_vec();
    let disposition = recorded.content_disposition.clone().unwrap_or_default();
    let range = recorded.content_range.clone();
    st.requests.push(recorded);

    if let Some((status, body)) = &st.upload_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, body.clone()).into_response();
    }

    // bytes {start}-{end}/{total}; the final chunk ends at total - 1.
    let is_final = range.as_deref().is_none_or(|r| {
        let Some((span, total)) = r.trim_start_matches("bytes ").split_once('/') else {
            return false;
        };
        let end = span.split_once('-').map(|(_, e)| e).unwrap_or_default();
        match (end.parse::<u64>(), total.parse::<u64>()) {
            (Ok(end), Ok(total)) => end + 1 == total,
            _ => false,
        }
    });
    if !is_final {
        return Json(json!({})).into_response();
    }

    let name = disposition
        .split_once("filename=\"")
        .map(|(_, rest)| rest.trim_end_matches('"').to_string())
        .unwrap_or_default();
    let asset = asset_json(&name, &Utc::now().format(DATE_FORMAT).to_string());
    st.assets.insert(0, asset.clone());
    Json(json!({ "asset": asset, "msg": "Upload completed" })).into_response()
}

async fn delete(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut st = state.lock().unwrap();
    st.requests
        .push(Recorded::new("DELETE", &format!("{ASSETS_PATH}{id}"), &headers));
    let before = st.assets.len();
    st.assets.retain(|a| a["id"] != id.as_str());
    if st.assets.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Asset not found" })))
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn lock(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = state.lock().unwrap();
    let mut recorded = Recorded::new("POST", &format!("{ASSETS_PATH}{id}"), &headers);
    recorded.body = body.to_string().into_bytes();
    st.requests.push(recorded);

    let locked = body["locked"].as_bool().unwrap_or(false);
    let Some(asset) = st.assets.iter_mut().find(|a| a["id"] == id.as_str()) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Asset not found" })))
            .into_response();
    };
    asset["locked"] = Value::Bool(locked);
    (StatusCode::CREATED, Json(asset.clone())).into_response()
}

/// Renderer keeping every view it was handed.
#[derive(Default)]
pub struct Views(pub Vec<ListingView>);

impl AssetListRenderer for Views {
    fn render(&mut self, view: &ListingView) {
        self.0.push(view.clone());
    }
}

impl Views {
    pub fn last(&self) -> &ListingView {
        self.0.last().expect("nothing rendered")
    }

    pub fn names(&self) -> Vec<String> {
        self.last().rows.iter().map(|r| r.name.clone()).collect()
    }
}

/// Analytics sink keeping every event.
#[derive(Default)]
pub struct Events(pub Vec<(String, Value)>);

impl Analytics for Events {
    fn track(&mut self, event: &str, properties: Value) {
        self.0.push((event.to_string(), properties));
    }
}

/// Quick check that the harness itself answers a listing request.
pub async fn first_page_names(server: &TestServer) -> Vec<String> {
    let source = paged_asset_source(server.client());
    let page = source
        .fetch(&assetlib::PageParams {
            page: 0,
            page_size: 50,
            sort_field: "date_added".to_string(),
            direction: assetlib::paging::Direction::Desc,
            filter: String::new(),
        })
        .await
        .expect("listing fetch failed");
    page.items.into_iter().map(|a| a.display_name).collect()
}
