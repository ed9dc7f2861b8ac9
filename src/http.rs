use crate::config::HttpSettings;
use reqwest::Client;
use std::time::Duration;

pub fn build_client(settings: &HttpSettings) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
