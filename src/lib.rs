//! # betfair-tables
//!
//! A Rust client for the Betfair Exchange betting API. Navigation and catalogue
//! queries come back as flat [`Table`]s ready for analysis; market books come
//! back as the decoded JSON records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use betfair_tables::{BetfairClient, CatalogueOptions, MarketFilter};
//!
//! # async fn example() -> betfair_tables::Result<()> {
//! let mut client = BetfairClient::new();
//! client.login("username", "password", "app-key").await?;
//!
//! // Competitions for soccer
//! let filter = MarketFilter::builder().event_type_ids(["1"]).build()?;
//! let competitions = client.competitions(&filter).await?;
//! println!("{:?}", competitions.columns());
//!
//! // Match odds markets with their runners, one row per runner
//! let filter = MarketFilter::builder()
//!     .event_type_ids(["1"])
//!     .market_type_codes(["MATCH_ODDS"])
//!     .build()?;
//! let options = CatalogueOptions {
//!     market_projection: Some(vec!["event".into(), "runner_description".into()]),
//!     max_results: Some(10),
//!     ..Default::default()
//! };
//! let markets = client.market_catalogue(&filter, &options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`BetfairClient::connect`] logs in with credentials from a `config.toml`:
//!
//! ```toml
//! [betfair]
//! username = "your_username"
//! password = "your_password"
//! api_key = "your_api_key"
//! locale = "en"             # optional
//!
//! [endpoints]               # optional, defaults to production
//! login_url = "https://identitysso.betfair.com/api/login"
//! betting_url = "https://api.betfair.com/exchange/betting/json-rpc/v1"
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod dto;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod request;
pub mod table;
pub mod transport;
pub mod validate;

// Re-export commonly used types at the crate root
pub use auth::{Credentials, Session, SessionSummary};
pub use client::{BetfairClient, CatalogueOptions, MarketBookOptions};
pub use config::{Config, Endpoints};
pub use error::{BetfairError, ErrorKind, Result};
pub use filter::{FilterBuilder, MarketFilter};
pub use request::{build_request, normalize_market_projection, Method, RequestExtras};
pub use table::Table;
