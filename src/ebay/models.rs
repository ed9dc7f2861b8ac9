use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Browse API `item_summary/search` and `search_by_image` response.
///
/// Every field is optional; a field holding the wrong JSON type is read
/// as absent instead of rejecting the whole response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub item_summaries: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<ImageDescriptor>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<PriceDescriptor>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_web_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PriceDescriptor {
    /// eBay sends amounts as decimal strings; numbers are tolerated.
    #[serde(default)]
    pub value: Option<Value>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Non-negative integer, also when encoded as an integral float (`57.0`).
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Number(number) = value else {
        return Ok(None);
    };
    if let Some(count) = number.as_u64() {
        return Ok(Some(count));
    }
    Ok(number
        .as_f64()
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64))
}
