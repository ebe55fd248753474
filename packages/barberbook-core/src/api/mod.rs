//! Authenticated access to the Barberbook API.

mod client;
pub mod config;

pub use client::{authorize, unwrap, ApiClient};
pub use config::{load_api_config, ApiConfig, ConfigSource};
