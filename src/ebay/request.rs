use crate::ebay::auth::AccessToken;
use crate::ebay::config::{EbayEndpoints, MarketplaceId};
use crate::models::{ImageSearch, KeywordSearch, SearchRequest};
use reqwest::Method;
use serde_json::{Value, json};
use std::fmt;
use urlencoding::encode;

pub const MARKETPLACE_HEADER: &str = "X-EBAY-C-MARKETPLACE-ID";
pub const PRICE_CURRENCY: &str = "USD";

/// A fully-formed upstream call, ready to hand to the search client.
#[derive(Clone, PartialEq)]
pub struct HttpRequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl HttpRequestSpec {
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case("authorization") {
                    (*key, "<redacted>")
                } else {
                    (*key, value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequestSpec")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

pub fn build(
    request: &SearchRequest,
    token: &AccessToken,
    endpoints: &EbayEndpoints,
    marketplace: MarketplaceId,
) -> HttpRequestSpec {
    match request {
        SearchRequest::Keyword(search) => build_keyword(search, token, endpoints, marketplace),
        SearchRequest::Image(search) => build_image(search, token, endpoints, marketplace),
    }
}

fn build_keyword(
    search: &KeywordSearch,
    token: &AccessToken,
    endpoints: &EbayEndpoints,
    marketplace: MarketplaceId,
) -> HttpRequestSpec {
    let filter = price_filter(search.min_price, search.max_price);
    let url = format!(
        "{}?q={}&limit={}&offset={}&filter={}",
        endpoints.keyword_search,
        encode(&search.query),
        search.limit,
        search.offset,
        encode(&filter),
    );
    HttpRequestSpec {
        method: Method::GET,
        url,
        headers: base_headers(token, marketplace),
        body: None,
    }
}

fn build_image(
    search: &ImageSearch,
    token: &AccessToken,
    endpoints: &EbayEndpoints,
    marketplace: MarketplaceId,
) -> HttpRequestSpec {
    let url = format!(
        "{}?limit={}&offset={}",
        endpoints.image_search, search.limit, search.offset
    );
    let mut headers = base_headers(token, marketplace);
    headers.push(("Content-Type", "application/json".to_string()));
    HttpRequestSpec {
        method: Method::POST,
        url,
        headers,
        body: Some(json!({ "image": search.image })),
    }
}

fn base_headers(token: &AccessToken, marketplace: MarketplaceId) -> Vec<(&'static str, String)> {
    vec![
        ("Authorization", format!("Bearer {}", token.secret())),
        (MARKETPLACE_HEADER, marketplace.ebay_code().to_string()),
    ]
}

/// Browse API filter expression for an optional price window.
///
/// Empty when neither bound is set; otherwise a single `price:[min..max]`
/// term (an unset side is left blank, i.e. unbounded) followed by the
/// currency term.
pub fn price_filter(min_price: Option<f64>, max_price: Option<f64>) -> String {
    if min_price.is_none() && max_price.is_none() {
        return String::new();
    }
    let bound = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    [
        format!("price:[{}..{}]", bound(min_price), bound(max_price)),
        format!("priceCurrency:{PRICE_CURRENCY}"),
    ]
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> EbayEndpoints {
        EbayEndpoints::from_root("https://api.ebay.com")
    }

    fn keyword(min: Option<f64>, max: Option<f64>) -> SearchRequest {
        KeywordSearch::new("vintage camera", Some(2), Some(0), min, max)
            .expect("valid")
            .into()
    }

    #[test]
    fn filter_is_empty_without_bounds() {
        assert_eq!(price_filter(None, None), "");
    }

    #[test]
    fn filter_with_both_bounds() {
        assert_eq!(
            price_filter(Some(10.0), Some(99.5)),
            "price:[10..99.5],priceCurrency:USD"
        );
    }

    #[test]
    fn filter_leaves_unset_bound_blank() {
        assert_eq!(
            price_filter(Some(25.0), None),
            "price:[25..],priceCurrency:USD"
        );
        assert_eq!(
            price_filter(None, Some(300.0)),
            "price:[..300],priceCurrency:USD"
        );
    }

    #[test]
    fn filter_has_single_price_term() {
        let filter = price_filter(Some(1.0), Some(2.0));
        assert_eq!(filter.matches("price:[").count(), 1);
        assert_eq!(filter.split(',').count(), 2);
    }

    #[test]
    fn keyword_request_encodes_query_and_filter() {
        let token = AccessToken::new("tok");
        let spec = build(
            &keyword(Some(10.0), None),
            &token,
            &endpoints(),
            MarketplaceId::EbayUs,
        );
        assert_eq!(spec.method, Method::GET);
        assert_eq!(
            spec.url,
            "https://api.ebay.com/buy/browse/v1/item_summary/search?q=vintage%20camera&limit=2&offset=0&filter=price%3A%5B10..%5D%2CpriceCurrency%3AUSD"
        );
        assert_eq!(spec.header("authorization"), Some("Bearer tok"));
        assert_eq!(spec.header(MARKETPLACE_HEADER), Some("EBAY_US"));
        assert_eq!(spec.body, None);
    }

    #[test]
    fn keyword_request_without_bounds_sends_empty_filter() {
        let spec = build(
            &keyword(None, None),
            &AccessToken::new("tok"),
            &endpoints(),
            MarketplaceId::EbayUs,
        );
        assert!(spec.url.ends_with("&filter="));
    }

    #[test]
    fn image_request_posts_json_body() {
        let request: SearchRequest = ImageSearch::new("aGVsbG8=", None, Some(48))
            .expect("valid")
            .into();
        let spec = build(
            &request,
            &AccessToken::new("tok"),
            &endpoints(),
            MarketplaceId::EbayDe,
        );
        assert_eq!(spec.method, Method::POST);
        assert_eq!(
            spec.url,
            "https://api.ebay.com/buy/browse/v1/item_summary/search_by_image?limit=24&offset=48"
        );
        assert_eq!(spec.body, Some(json!({ "image": "aGVsbG8=" })));
        assert_eq!(spec.header("content-type"), Some("application/json"));
        assert_eq!(spec.header(MARKETPLACE_HEADER), Some("EBAY_DE"));
    }

    #[test]
    fn debug_output_redacts_bearer_token() {
        let spec = build(
            &keyword(None, None),
            &AccessToken::new("very-secret-token"),
            &endpoints(),
            MarketplaceId::EbayUs,
        );
        let rendered = format!("{spec:?}");
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
