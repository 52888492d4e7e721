//! Site extraction routines.
//!
//! Every routine is reached through [`Scraper`]. Sites that follow the common
//! fetch → parse → identify → price pipeline implement [`Storefront`] instead
//! and get [`Scraper`] through the blanket impl below, so adding a site means
//! writing the site-specific hooks and registering it.

pub mod bestbuy;
pub mod newegg;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{FetchError, ScrapeError};
use crate::fetch::{Headers, HttpFetcher, PageFetcher};
use crate::session::{HttpSessionProvider, SessionProvider};
use crate::types::{Product, SessionContext, PRICE_UNAVAILABLE, UNKNOWN_TITLE};

pub use bestbuy::BestBuy;
pub use newegg::Newegg;

pub const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/png,image/svg+xml,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Network collaborators shared by every routine. Holds no per-request state.
#[derive(Clone)]
pub struct ScrapeContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub sessions: Arc<dyn SessionProvider>,
}

impl ScrapeContext {
    pub fn new(fetcher: Arc<dyn PageFetcher>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { fetcher, sessions }
    }

    /// Live HTTP plumbing. Page fetches and cookie harvests share one
    /// connection pool and the configured timeout.
    pub fn http(config: &Config) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.request_timeout)?;
        let sessions = HttpSessionProvider::new(fetcher.client().clone());
        Ok(Self::new(Arc::new(fetcher), Arc::new(sessions)))
    }
}

/// Best-effort fields read from a product page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub title: Option<String>,
    pub price: Option<String>,
}

/// Headers every product page request carries.
pub fn browser_headers(session: &SessionContext) -> Headers {
    let mut headers: Headers = vec![
        ("User-Agent", session.user_agent.clone()),
        ("Accept", PAGE_ACCEPT.to_string()),
        ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
    ];
    if !session.cookie_header.is_empty() {
        headers.push(("Cookie", session.cookie_header.clone()));
    }
    headers
}

/// The uniform invocation contract the dispatcher relies on.
#[async_trait]
pub trait Scraper: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, url: &str, ctx: &ScrapeContext) -> Result<Product, ScrapeError>;
}

/// Site-specific hooks for the shared product pipeline.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Registry identity; also stamped on every result.
    const NAME: &'static str;

    /// Origin the session cookies are harvested from.
    fn origin(&self) -> &str;

    fn page_headers(&self, session: &SessionContext) -> Headers {
        browser_headers(session)
    }

    /// Must not fail: anything missing stays `None`.
    fn parse_page(&self, html: &str) -> ParsedPage;

    fn product_id(&self, url: &str) -> String;

    async fn resolve_price(
        &self,
        _ctx: &ScrapeContext,
        page: &ParsedPage,
        _product_id: &str,
        _session: &SessionContext,
    ) -> Option<String> {
        page.price.clone()
    }
}

#[async_trait]
impl<T: Storefront> Scraper for T {
    fn name(&self) -> &'static str {
        T::NAME
    }

    async fn execute(&self, url: &str, ctx: &ScrapeContext) -> Result<Product, ScrapeError> {
        let session = ctx.sessions.session_for(self.origin()).await;
        let headers = self.page_headers(&session);

        let html = ctx.fetcher.fetch(url, &headers).await.map_err(|e| {
            warn!(scraper = T::NAME, url, error = %e, "product page fetch failed");
            ScrapeError::PageFetch(e)
        })?;

        let page = self.parse_page(&html);
        if page.title.is_none() {
            debug!(scraper = T::NAME, url, "no title on page");
        }

        let product_id = self.product_id(url);
        let price = self.resolve_price(ctx, &page, &product_id, &session).await;
        if price.is_none() {
            debug!(scraper = T::NAME, url, product_id = %product_id, "price unresolved");
        }

        Ok(Product {
            title: page.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            product_id,
            price: price.unwrap_or_else(|| PRICE_UNAVAILABLE.to_string()),
            url: url.to_string(),
            scraper: T::NAME.to_string(),
        })
    }
}

/// Text after the last occurrence of `marker`, or all of `url` when the
/// marker is absent.
pub(crate) fn after_last<'a>(url: &'a str, marker: &str) -> &'a str {
    match url.rfind(marker) {
        Some(idx) => &url[idx + marker.len()..],
        None => url,
    }
}

/// Cuts `text` at the first of any `delimiters`.
pub(crate) fn until_any<'a>(text: &'a str, delimiters: &[char]) -> &'a str {
    match text.find(delimiters) {
        Some(idx) => &text[..idx],
        None => text,
    }
}
