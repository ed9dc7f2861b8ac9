use std::{env, fmt};

pub const DEFAULT_API_ROOT: &str = "https://api.ebay.com";

/// Application scope granted to client-credential tokens.
pub const APP_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            env::var("EBAY_PROD_APP_ID").unwrap_or_default(),
            env::var("EBAY_PROD_CERT_ID").unwrap_or_default(),
        )
    }

    pub fn is_complete(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[allow(clippy::enum_variant_names)]
pub enum MarketplaceId {
    #[default]
    EbayUs,
    EbayUk,
    EbayDe,
}

impl MarketplaceId {
    pub fn ebay_code(&self) -> &'static str {
        match self {
            MarketplaceId::EbayUs => "EBAY_US",
            MarketplaceId::EbayUk => "EBAY_GB",
            MarketplaceId::EbayDe => "EBAY_DE",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_uppercase().as_str() {
            "EBAY_US" => Some(MarketplaceId::EbayUs),
            "EBAY_GB" | "EBAY_UK" => Some(MarketplaceId::EbayUk),
            "EBAY_DE" => Some(MarketplaceId::EbayDe),
            _ => None,
        }
    }
}

/// Absolute URLs of the three upstream endpoints the gateway talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbayEndpoints {
    pub oauth_token: String,
    pub keyword_search: String,
    pub image_search: String,
}

impl EbayEndpoints {
    pub fn from_root(root: &str) -> Self {
        let root = root.trim().trim_end_matches('/');
        Self {
            oauth_token: format!("{root}/identity/v1/oauth2/token"),
            keyword_search: format!("{root}/buy/browse/v1/item_summary/search"),
            image_search: format!("{root}/buy/browse/v1/item_summary/search_by_image"),
        }
    }
}

impl Default for EbayEndpoints {
    fn default() -> Self {
        Self::from_root(DEFAULT_API_ROOT)
    }
}

#[derive(Debug, Clone)]
pub struct EbayConfig {
    pub credentials: Credentials,
    pub endpoints: EbayEndpoints,
    pub marketplace: MarketplaceId,
    pub scope: String,
}

impl EbayConfig {
    pub fn new(credentials: Credentials, api_root: &str) -> Self {
        Self {
            credentials,
            endpoints: EbayEndpoints::from_root(api_root),
            marketplace: MarketplaceId::default(),
            scope: APP_SCOPE.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let root = env::var("EBAY_API_ROOT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
        let marketplace = env::var("EBAY_MARKETPLACE_ID")
            .ok()
            .and_then(|value| MarketplaceId::parse(&value))
            .unwrap_or_default();
        Self {
            marketplace,
            ..Self::new(Credentials::from_env(), &root)
        }
    }
}
