pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod request;
pub mod sold;
#[cfg(test)]
pub mod stub;
