use crate::models::{ItemDetails, MarketAnalysisPayload, SearchPayload};
use async_graphql::SimpleObject;

/// Details for a single item listing from eBay.
#[derive(SimpleObject)]
#[graphql(name = "ItemDetails")]
pub struct GqlItemDetails {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub current_price: f64,
    pub item_web_url: Option<String>,
}

/// The structured response from an eBay search query.
#[derive(SimpleObject)]
#[graphql(name = "SearchPayload")]
pub struct GqlSearchPayload {
    pub items: Vec<GqlItemDetails>,
    pub total: u64,
}

/// The final payload returned to the client, including AI analysis.
#[derive(SimpleObject)]
#[graphql(name = "MarketAnalysisPayload")]
pub struct GqlMarketAnalysisPayload {
    pub ebay_results: Option<GqlSearchPayload>,
    pub ai_analysis: String,
}

impl From<ItemDetails> for GqlItemDetails {
    fn from(item: ItemDetails) -> Self {
        Self {
            title: item.title,
            image_url: item.image_url,
            current_price: item.current_price,
            item_web_url: item.item_web_url,
        }
    }
}

impl From<SearchPayload> for GqlSearchPayload {
    fn from(payload: SearchPayload) -> Self {
        Self {
            items: payload.items.into_iter().map(GqlItemDetails::from).collect(),
            total: payload.total,
        }
    }
}

impl From<MarketAnalysisPayload> for GqlMarketAnalysisPayload {
    fn from(payload: MarketAnalysisPayload) -> Self {
        Self {
            ebay_results: payload.ebay_results.map(GqlSearchPayload::from),
            ai_analysis: payload.ai_analysis,
        }
    }
}
