use async_graphql::{Context, EmptySubscription, Object, Result, Schema};

use super::types::GqlMarketAnalysisPayload;
use crate::ebay::sold::SoldListingsScraper;
use crate::models::{ImageSearch, InvalidSearch, KeywordSearch};
use crate::search::SearchOrchestrator;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub const HELLO: &str = "Hello from the Sanbi AI Agent API!";

pub fn build_schema(orchestrator: SearchOrchestrator, scraper: SoldListingsScraper) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(orchestrator)
        .data(scraper)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// A simple query to test if the server is running.
    async fn hello(&self) -> &'static str {
        HELLO
    }

    /// Prices of recently sold listings matching the search term, empty
    /// when the scrape fails.
    async fn sold_prices(&self, ctx: &Context<'_>, search_term: String) -> Result<Vec<f64>> {
        if search_term.trim().is_empty() {
            return Err(InvalidSearch::EmptyQuery.into());
        }
        let scraper = ctx.data_unchecked::<SoldListingsScraper>();
        Ok(scraper.sold_prices(&search_term).await)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Performs a keyword search on eBay and prepares for AI analysis.
    async fn search_by_keyword(
        &self,
        ctx: &Context<'_>,
        query: String,
        limit: Option<u32>,
        offset: Option<u32>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<GqlMarketAnalysisPayload> {
        let search = KeywordSearch::new(query, limit, offset, min_price, max_price)?;
        let orchestrator = ctx.data_unchecked::<SearchOrchestrator>();
        Ok(orchestrator.search_by_keyword(search).await.into())
    }

    /// Performs an image-based search on eBay and prepares for AI analysis.
    async fn search_by_image(
        &self,
        ctx: &Context<'_>,
        image: String,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<GqlMarketAnalysisPayload> {
        let search = ImageSearch::new(image, limit, offset)?;
        let orchestrator = ctx.data_unchecked::<SearchOrchestrator>();
        Ok(orchestrator.search_by_image(search).await.into())
    }
}
