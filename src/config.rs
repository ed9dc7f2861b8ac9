use crate::ebay::config::EbayConfig;
use crate::ebay::sold::SoldListingsConfig;
use std::env;

/// Process-wide settings, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub ebay: EbayConfig,
    pub sold: SoldListingsConfig,
    pub http: HttpSettings,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: env_parse("HTTP_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
            connect_timeout_secs: env_parse("HTTP_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout_secs),
        }
    }
}

impl GatewayConfig {
    pub fn new(ebay: EbayConfig) -> Self {
        Self {
            ebay,
            sold: SoldListingsConfig::default(),
            http: HttpSettings::default(),
            port: 4000,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(EbayConfig::from_env());
        config.sold = SoldListingsConfig::from_env();
        config.http = HttpSettings::from_env();
        if let Some(port) = env_parse::<u16>("PORT") {
            config.port = port;
        }
        if let Some(limit) = env_parse::<usize>("REQUEST_MAX_BYTES").filter(|v| *v > 0) {
            config.max_body_bytes = limit;
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
