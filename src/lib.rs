//! Fetches product pages from retail sites and normalizes each into a
//! `{title, product_id, price}` record.
//!
//! A [`Registry`] maps scraper names to [`Scraper`] routines; the
//! [`Dispatcher`] resolves a name, runs the routine in its own task behind an
//! admission limit, and hands back a [`ScrapeResult`].

pub mod api;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod html_extractor;
pub mod logging;
pub mod registry;
pub mod scrapers;
pub mod session;
pub mod types;

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{ConfigError, DiscoveryError, FetchError, ScrapeError};
pub use registry::Registry;
pub use scrapers::{ScrapeContext, Scraper, Storefront};
pub use types::{Product, ScrapeRequest, ScrapeResult, SessionContext, PRICE_UNAVAILABLE, UNKNOWN_TITLE};
