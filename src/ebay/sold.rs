use crate::config::HttpSettings;
use crate::http::build_client;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::{env, fmt};
use thiserror::Error;
use tracing::{info, warn};
use urlencoding::encode;

pub const DEFAULT_PROXY_URL: &str = "https://proxy.scrapeops.io/v1/";
pub const SOLD_SEARCH_PAGE: &str = "https://www.ebay.com/sch/i.html";

const LISTING_SELECTOR: &str = "li.s-card, li.s-item";
const TITLE_SELECTOR: &str = "div.s-card__title, div.s-item__title span[role='heading']";
const PRICE_SELECTOR: &str = "span.s-card__price, span.s-item__price";
const AMOUNT_PATTERN: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";
const PROMO_TITLE: &str = "Shop on eBay";

#[derive(Clone)]
pub struct SoldListingsConfig {
    pub api_key: Option<String>,
    pub proxy_url: String,
    pub timeout_secs: u64,
}

impl Default for SoldListingsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl SoldListingsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("SCRAPEOPS_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            proxy_url: env::var("SCRAPEOPS_PROXY_URL").unwrap_or(defaults.proxy_url),
            timeout_secs: env::var("SCRAPEOPS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

impl fmt::Debug for SoldListingsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoldListingsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("proxy_url", &self.proxy_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SoldScrapeError {
    #[error("SCRAPEOPS_API_KEY is not set")]
    MissingApiKey,
    #[error("proxy request failed: {0}")]
    Request(String),
    #[error("proxy returned HTTP {0}")]
    Status(u16),
}

/// Collects realized prices from eBay's completed-and-sold results page,
/// fetched through the ScrapeOps proxy.
#[derive(Clone)]
pub struct SoldListingsScraper {
    http: Client,
    config: SoldListingsConfig,
}

impl SoldListingsScraper {
    pub fn new(config: SoldListingsConfig, http: &HttpSettings) -> Self {
        let settings = HttpSettings {
            timeout_secs: config.timeout_secs,
            ..*http
        };
        Self {
            http: build_client(&settings),
            config,
        }
    }

    /// Sold prices in page order. Any failure yields an empty list.
    pub async fn sold_prices(&self, search_term: &str) -> Vec<f64> {
        match self.fetch_page(search_term).await {
            Ok(page) => {
                let prices = extract_sold_prices(&page);
                info!(
                    target = "sanbi.sold",
                    search_term = %search_term,
                    prices = prices.len(),
                    "sold listings scraped"
                );
                prices
            }
            Err(err) => {
                warn!(
                    target = "sanbi.sold",
                    search_term = %search_term,
                    error = %err,
                    "sold listings scrape failed"
                );
                Vec::new()
            }
        }
    }

    async fn fetch_page(&self, search_term: &str) -> Result<String, SoldScrapeError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SoldScrapeError::MissingApiKey)?;
        let target = sold_search_url(search_term);
        let response = self
            .http
            .get(self.config.proxy_url.as_str())
            .query(&[("api_key", api_key), ("url", target.as_str())])
            .send()
            .await
            .map_err(|err| SoldScrapeError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(SoldScrapeError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| SoldScrapeError::Request(err.to_string()))
    }
}

/// eBay results URL restricted to completed, sold listings.
pub fn sold_search_url(search_term: &str) -> String {
    let keywords = search_term
        .split_whitespace()
        .map(|word| encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!("{SOLD_SEARCH_PAGE}?_nkw={keywords}&LH_Complete=1&LH_Sold=1")
}

struct ListingPatterns {
    listing: Selector,
    title: Selector,
    price: Selector,
    amount: Regex,
}

impl ListingPatterns {
    fn new() -> Option<Self> {
        Some(Self {
            listing: Selector::parse(LISTING_SELECTOR).ok()?,
            title: Selector::parse(TITLE_SELECTOR).ok()?,
            price: Selector::parse(PRICE_SELECTOR).ok()?,
            amount: Regex::new(AMOUNT_PATTERN).ok()?,
        })
    }
}

/// Prices of listings that carry both a title and a price. Promotional
/// cards and non-positive prices are skipped.
pub fn extract_sold_prices(page: &str) -> Vec<f64> {
    let Some(patterns) = ListingPatterns::new() else {
        return Vec::new();
    };
    let document = Html::parse_document(page);
    document
        .select(&patterns.listing)
        .filter_map(|listing| {
            let title = element_text(listing.select(&patterns.title).next()?);
            let price_text = element_text(listing.select(&patterns.price).next()?);
            let price = parse_amount(&patterns.amount, &price_text);
            (price > 0.0 && !title.contains(PROMO_TITLE)).then_some(price)
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// First amount in the text; a range like "$45.00 to $60.00" yields 45.
fn parse_amount(pattern: &Regex, text: &str) -> f64 {
    pattern
        .find(text)
        .and_then(|found| found.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}
