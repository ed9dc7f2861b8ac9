use crate::config::GatewayConfig;
use crate::ebay::auth::{EbayAuthError, TokenProvider};
use crate::ebay::client::{EbaySearchError, UpstreamSearchClient};
use crate::ebay::request;
use crate::http::build_client;
use crate::metrics;
use crate::models::{
    ImageSearch, KeywordSearch, MarketAnalysisPayload, SearchPayload, SearchRequest,
};
use crate::normalize::normalize;
use std::{sync::Arc, time::Instant};
use thiserror::Error;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("upstream auth failed: {0}")]
    UpstreamAuth(EbayAuthError),
    #[error("upstream search failed: {0}")]
    UpstreamSearch(#[from] EbaySearchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    Configuration,
    UpstreamAuth,
    UpstreamSearch,
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::Configuration(_) => SearchErrorKind::Configuration,
            SearchError::UpstreamAuth(_) => SearchErrorKind::UpstreamAuth,
            SearchError::UpstreamSearch(_) => SearchErrorKind::UpstreamSearch,
        }
    }
}

impl From<EbayAuthError> for SearchError {
    fn from(value: EbayAuthError) -> Self {
        match value {
            EbayAuthError::MissingCredentials => SearchError::Configuration(value.to_string()),
            other => SearchError::UpstreamAuth(other),
        }
    }
}

/// Runs a search end to end: token, request, upstream call, normalization.
///
/// Failures never leave this type; callers always get a well-formed
/// [`MarketAnalysisPayload`], degraded to empty results when any step fails.
#[derive(Clone)]
pub struct SearchOrchestrator {
    config: Arc<GatewayConfig>,
    tokens: TokenProvider,
    upstream: UpstreamSearchClient,
}

impl SearchOrchestrator {
    pub fn new(config: Arc<GatewayConfig>) -> Self {
        let http = build_client(&config.http);
        let tokens = TokenProvider::new(
            http.clone(),
            config.ebay.endpoints.oauth_token.clone(),
            config.ebay.scope.clone(),
        );
        Self {
            config,
            tokens,
            upstream: UpstreamSearchClient::new(http),
        }
    }

    pub async fn search_by_keyword(&self, search: KeywordSearch) -> MarketAnalysisPayload {
        self.run(SearchRequest::Keyword(search)).await
    }

    pub async fn search_by_image(&self, search: ImageSearch) -> MarketAnalysisPayload {
        self.run(SearchRequest::Image(search)).await
    }

    pub async fn run(&self, request: SearchRequest) -> MarketAnalysisPayload {
        let mode = request.mode();
        let span = info_span!(
            "search",
            invocation = %Uuid::new_v4(),
            mode = mode.as_str(),
        );
        async move {
            metrics::inc_searches(mode.as_str());
            match &request {
                SearchRequest::Keyword(search) => info!(
                    target = "sanbi.search",
                    query = %search.query,
                    limit = search.limit,
                    offset = search.offset,
                    "performing ebay keyword search"
                ),
                SearchRequest::Image(search) => info!(
                    target = "sanbi.search",
                    image_bytes = search.image.len(),
                    limit = search.limit,
                    offset = search.offset,
                    "performing ebay image search"
                ),
            }

            match self.execute(&request).await {
                Ok(results) => {
                    metrics::search_outcome(mode.as_str(), false);
                    info!(
                        target = "sanbi.search",
                        items = results.items.len(),
                        total = results.total,
                        "ebay search completed"
                    );
                    MarketAnalysisPayload::success(results)
                }
                Err(err) => {
                    metrics::search_outcome(mode.as_str(), true);
                    warn!(
                        target = "sanbi.search",
                        kind = ?err.kind(),
                        error = %err,
                        "ebay search failed; returning degraded result"
                    );
                    MarketAnalysisPayload::degraded(mode)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, search: &SearchRequest) -> Result<SearchPayload, SearchError> {
        let ebay = &self.config.ebay;

        let started = Instant::now();
        let token = self.tokens.acquire_token(&ebay.credentials).await?;
        metrics::stage_elapsed("acquire_token", started.elapsed().as_millis());

        let spec = request::build(search, &token, &ebay.endpoints, ebay.marketplace);

        let started = Instant::now();
        let raw = self.upstream.execute(&spec).await?;
        metrics::stage_elapsed("upstream_search", started.elapsed().as_millis());

        Ok(normalize(raw))
    }
}
