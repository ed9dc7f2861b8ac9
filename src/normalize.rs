use crate::ebay::models::{ItemSummary, PriceDescriptor, SearchResponse};
use crate::models::{ItemDetails, SearchPayload};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Maps a raw Browse API response onto the canonical payload. Never fails:
/// anything missing or malformed falls back to the empty/zero default.
pub fn normalize(raw: Value) -> SearchPayload {
    let response: SearchResponse = from_object(raw);
    let items = response
        .item_summaries
        .unwrap_or_default()
        .into_iter()
        .map(normalize_item)
        .collect();
    SearchPayload {
        items,
        total: response.total.unwrap_or(0),
    }
}

fn normalize_item(raw: Value) -> ItemDetails {
    let summary: ItemSummary = from_object(raw);
    ItemDetails {
        title: summary.title,
        image_url: summary.image.and_then(|image| image.image_url),
        current_price: summary.price.as_ref().and_then(price_value).unwrap_or(0.0),
        item_web_url: summary.item_web_url,
    }
}

// Serde also accepts a JSON array for a struct; only objects are records here.
fn from_object<T: DeserializeOwned + Default>(raw: Value) -> T {
    if !raw.is_object() {
        return T::default();
    }
    serde_json::from_value(raw).unwrap_or_default()
}

// Absent and unparseable both collapse to 0 downstream, so "free" and
// "unknown" are indistinguishable in the payload.
fn price_value(price: &PriceDescriptor) -> Option<f64> {
    let parsed = match price.value.as_ref()? {
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Number(number) => number.as_f64(),
        _ => None,
    };
    parsed.filter(|value| value.is_finite())
}
