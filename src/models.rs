use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_LIMIT: u32 = 24;
pub const DEFAULT_OFFSET: u32 = 0;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidSearch {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("image must not be empty")]
    EmptyImage,
    #[error("{field} must be a non-negative number")]
    InvalidPrice { field: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSearch {
    pub query: String,
    pub limit: u32,
    pub offset: u32,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl KeywordSearch {
    /// Applies the default page window and rejects empty queries or
    /// negative price bounds. `min_price <= max_price` is left to upstream.
    pub fn new(
        query: impl Into<String>,
        limit: Option<u32>,
        offset: Option<u32>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Self, InvalidSearch> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(InvalidSearch::EmptyQuery);
        }
        check_price("minPrice", min_price)?;
        check_price("maxPrice", max_price)?;
        Ok(Self {
            query,
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
            min_price,
            max_price,
        })
    }
}

#[derive(Clone, PartialEq)]
pub struct ImageSearch {
    /// Base64-encoded image bytes.
    pub image: String,
    pub limit: u32,
    pub offset: u32,
}

impl ImageSearch {
    pub fn new(
        image: impl Into<String>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, InvalidSearch> {
        let image = image.into();
        if image.trim().is_empty() {
            return Err(InvalidSearch::EmptyImage);
        }
        Ok(Self {
            image,
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
        })
    }
}

// Image payloads run to megabytes; keep them out of logs.
impl std::fmt::Debug for ImageSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSearch")
            .field("image_len", &self.image.len())
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

fn check_price(field: &'static str, value: Option<f64>) -> Result<(), InvalidSearch> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(InvalidSearch::InvalidPrice { field }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Keyword(KeywordSearch),
    Image(ImageSearch),
}

impl SearchRequest {
    pub fn mode(&self) -> SearchMode {
        match self {
            SearchRequest::Keyword(_) => SearchMode::Keyword,
            SearchRequest::Image(_) => SearchMode::Image,
        }
    }
}

impl From<KeywordSearch> for SearchRequest {
    fn from(value: KeywordSearch) -> Self {
        SearchRequest::Keyword(value)
    }
}

impl From<ImageSearch> for SearchRequest {
    fn from(value: ImageSearch) -> Self {
        SearchRequest::Image(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Image,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Image => "image",
        }
    }

    /// Text placed in `aiAnalysis` when the upstream call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            SearchMode::Keyword => {
                "Failed to retrieve data from eBay. Cannot perform analysis. Please check server logs."
            }
            SearchMode::Image => {
                "Failed to retrieve data from eBay via image search. Cannot perform analysis."
            }
        }
    }
}

pub const AI_ANALYSIS_PLACEHOLDER: &str = "AI analysis is not yet implemented. This section will provide market insights and recommendations.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub current_price: f64,
    pub item_web_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPayload {
    pub items: Vec<ItemDetails>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAnalysisPayload {
    pub ebay_results: Option<SearchPayload>,
    pub ai_analysis: String,
}

impl MarketAnalysisPayload {
    pub fn success(results: SearchPayload) -> Self {
        Self {
            ebay_results: Some(results),
            ai_analysis: AI_ANALYSIS_PLACEHOLDER.to_string(),
        }
    }

    pub fn degraded(mode: SearchMode) -> Self {
        Self {
            ebay_results: Some(SearchPayload::default()),
            ai_analysis: mode.failure_message().to_string(),
        }
    }
}
