//! Barberbook Core Library
//!
//! This crate provides the core functionality behind the Barberbook apps:
//! - Provider search, filtering and ranking
//! - Session state persisted across restarts (keyring with file fallback)
//! - Authenticated API access with bearer token injection
//! - Service selection and booking
//!
//! # Features
//!
//! - `keyring-storage` (default): Use platform keyring for credential storage
//! - `file-storage`: Use file-based credential storage only, even alongside
//!   `keyring-storage` (for headless Linux)
//!
//! # Example
//!
//! ```no_run
//! use barberbook_core::{api, auth, catalog, filter, session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Hydrate the session before any request is built
//!     let credentials = auth::CredentialStore::open_default()?;
//!     let session = session::SessionStore::hydrate(credentials);
//!
//!     // Fetch the catalog with the stored token attached
//!     let client = api::ApiClient::new(&api::load_api_config(), session)?;
//!     let barbers = client.list_barbers().await?;
//!
//!     // Narrow it down
//!     let spec = filter::FilterSpec {
//!         search_text: "fade".to_string(),
//!         sort_by: filter::SortBy::Rating,
//!         ..Default::default()
//!     };
//!     for barber in filter::apply(&barbers, &spec) {
//!         println!("{} ({})", barber.name, barber.rating);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod session;

// Re-export commonly used types
pub use api::{ApiClient, ApiConfig, ConfigSource};
pub use auth::{CredentialStore, User};
pub use booking::{BookingConfirmation, BookingRequest, ServiceSelection};
pub use catalog::{Location, PriceRange, Provider, Service};
pub use error::{ApiError, BookingError, ParseError, StorageError};
pub use filter::{Availability, FilterSpec, MinRating, PriceBand, SortBy};
pub use session::{Session, SessionAction, SessionStore};
