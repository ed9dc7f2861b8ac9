//! In-process stand-in for the eBay OAuth and Browse endpoints and the
//! scraping proxy, used by tests.

use crate::ebay::config::EbayEndpoints;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct StubBehaviour {
    pub token_status: u16,
    pub token_body: Option<Value>,
    pub token_raw_body: Option<String>,
    pub search_status: u16,
    pub search_body: Value,
    pub search_raw_body: Option<String>,
    pub sold_status: u16,
    pub sold_html: String,
}

impl Default for StubBehaviour {
    fn default() -> Self {
        Self {
            token_status: 200,
            token_body: None,
            token_raw_body: None,
            search_status: 200,
            search_body: camera_results(),
            search_raw_body: None,
            sold_status: 200,
            sold_html: SOLD_LISTINGS_HTML.to_string(),
        }
    }
}

/// The two-item response used by the end-to-end examples.
pub fn camera_results() -> Value {
    json!({
        "href": "https://api.ebay.com/buy/browse/v1/item_summary/search?q=vintage%20camera",
        "total": 57,
        "limit": 2,
        "offset": 0,
        "itemSummaries": [
            {
                "itemId": "v1|1|0",
                "title": "Camera A",
                "price": { "value": "120.50", "currency": "USD" },
                "itemWebUrl": "http://x/1"
            },
            {
                "itemId": "v1|2|0",
                "title": "Camera B"
            }
        ]
    })
}

/// Sold-listings results page: two markup generations, a promo card, a
/// zero-price entry, one without a price and a price range.
pub const SOLD_LISTINGS_HTML: &str = r#"<!doctype html>
<html><body>
<ul class="srp-results">
  <li class="s-item">
    <div class="s-item__title"><span role="heading">Shop on eBay</span></div>
    <span class="s-item__price">$20.00</span>
  </li>
  <li class="s-item">
    <div class="s-item__title"><span role="heading">Canon AE-1 Program 35mm</span></div>
    <span class="s-item__price">$1,234.56</span>
  </li>
  <li class="s-card">
    <div class="s-card__title">Minolta X-700 with 50mm lens</div>
    <span class="s-card__price">$89.99</span>
  </li>
  <li class="s-item">
    <div class="s-item__title"><span role="heading">Lens cap only</span></div>
    <span class="s-item__price">$0.00</span>
  </li>
  <li class="s-item">
    <div class="s-item__title"><span role="heading">Listing without price</span></div>
  </li>
  <li class="s-card">
    <div class="s-card__title">Pentax K1000 body</div>
    <span class="s-card__price">$45.00 to $60.00</span>
  </li>
</ul>
</body></html>"#;

#[derive(Debug, Clone)]
pub struct RecordedToken {
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub path: &'static str,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub marketplace: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Recorder {
    tokens: Vec<RecordedToken>,
    searches: Vec<RecordedSearch>,
    proxied: Vec<HashMap<String, String>>,
}

struct StubState {
    behaviour: StubBehaviour,
    recorder: Mutex<Recorder>,
}

pub struct StubEbay {
    addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubEbay {
    pub const TOKEN: &'static str = "v^1.1#i^1#stub-app-token";

    pub async fn spawn(behaviour: StubBehaviour) -> Self {
        let state = Arc::new(StubState {
            behaviour,
            recorder: Mutex::new(Recorder::default()),
        });
        let app = Router::new()
            .route("/identity/v1/oauth2/token", post(token))
            .route("/buy/browse/v1/item_summary/search", get(keyword_search))
            .route(
                "/buy/browse/v1/item_summary/search_by_image",
                post(image_search),
            )
            .route("/v1/", get(proxy_page))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app.into_make_service()).await;
        });
        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn api_root(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoints(&self) -> EbayEndpoints {
        EbayEndpoints::from_root(&self.api_root())
    }

    pub fn proxy_url(&self) -> String {
        format!("{}/v1/", self.api_root())
    }

    pub fn token_calls(&self) -> usize {
        self.token_requests().len()
    }

    pub fn token_requests(&self) -> Vec<RecordedToken> {
        self.state.recorder.lock().expect("recorder").tokens.clone()
    }

    pub fn search_requests(&self) -> Vec<RecordedSearch> {
        self.state.recorder.lock().expect("recorder").searches.clone()
    }

    /// Query strings received by the scraping-proxy route.
    pub fn proxy_requests(&self) -> Vec<HashMap<String, String>> {
        self.state.recorder.lock().expect("recorder").proxied.clone()
    }
}

impl Drop for StubEbay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn token(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state
        .recorder
        .lock()
        .expect("recorder")
        .tokens
        .push(RecordedToken {
            authorization: header_value(&headers, header::AUTHORIZATION.as_str()),
            form,
        });

    let behaviour = &state.behaviour;
    if behaviour.token_status != 200 {
        return (
            status(behaviour.token_status),
            Json(json!({
                "error": "invalid_client",
                "error_description": "client authentication failed"
            })),
        )
            .into_response();
    }
    if let Some(raw) = &behaviour.token_raw_body {
        return (StatusCode::OK, raw.clone()).into_response();
    }
    let body = behaviour.token_body.clone().unwrap_or_else(|| {
        json!({
            "access_token": StubEbay::TOKEN,
            "expires_in": 7200,
            "token_type": "Application Access Token"
        })
    });
    Json(body).into_response()
}

async fn keyword_search(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record_search(
        &state,
        "/buy/browse/v1/item_summary/search",
        &headers,
        query,
        None,
    );
    search_response(&state.behaviour)
}

async fn image_search(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record_search(
        &state,
        "/buy/browse/v1/item_summary/search_by_image",
        &headers,
        query,
        Some(body),
    );
    search_response(&state.behaviour)
}

async fn proxy_page(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.recorder.lock().expect("recorder").proxied.push(query);
    let behaviour = &state.behaviour;
    if behaviour.sold_status != 200 {
        return (status(behaviour.sold_status), "proxy error").into_response();
    }
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        behaviour.sold_html.clone(),
    )
        .into_response()
}

fn record_search(
    state: &StubState,
    path: &'static str,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Option<Value>,
) {
    state
        .recorder
        .lock()
        .expect("recorder")
        .searches
        .push(RecordedSearch {
            path,
            query,
            authorization: header_value(headers, header::AUTHORIZATION.as_str()),
            marketplace: header_value(headers, "X-EBAY-C-MARKETPLACE-ID"),
            body,
        });
}

fn search_response(behaviour: &StubBehaviour) -> Response {
    if behaviour.search_status != 200 {
        return (
            status(behaviour.search_status),
            Json(json!({
                "errors": [{ "errorId": 10001, "message": "The search could not be completed." }]
            })),
        )
            .into_response();
    }
    if let Some(raw) = &behaviour.search_raw_body {
        return (StatusCode::OK, raw.clone()).into_response();
    }
    Json(behaviour.search_body.clone()).into_response()
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
