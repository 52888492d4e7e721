#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use product_scraper::fetch::PageFetcher;
use product_scraper::session::SessionProvider;
use product_scraper::{FetchError, ScrapeContext, SessionContext};

pub const TEST_AGENT: &str = "TestAgent/1.0";
pub const TEST_COOKIES: &str = "sid=test; locale=en-US";

pub const BESTBUY_URL: &str =
    "https://www.bestbuy.com/site/apple-macbook-air-13-6-laptop-m2-chip/6509650.p?skuId=6509650";
pub const NEWEGG_URL: &str = "https://www.newegg.com/asus-rog-strix-rtx-4070/p/N82E16814126?ref=x";

pub const BESTBUY_PAGE: &str =
    "<html><head><title>Apple - MacBook Air 13.6\" Laptop - Best Buy</title></head><body></body></html>";

pub const NEWEGG_PAGE: &str = r#"
    <html><body>
      <h1 class="product-title">ASUS ROG Strix GeForce RTX 4070</h1>
      <div class="product-price"><ul><li class="price-current">$<strong>599</strong><sup>.99</sup></li></ul></div>
    </body></html>
"#;

pub struct FixedSessions;

#[async_trait]
impl SessionProvider for FixedSessions {
    async fn session_for(&self, _origin: &str) -> SessionContext {
        SessionContext {
            user_agent: TEST_AGENT.to_string(),
            cookie_header: TEST_COOKIES.to_string(),
        }
    }
}

#[derive(Clone)]
enum Reply {
    Body(String),
    Status(u16),
}

/// Answers by URL prefix; unmatched URLs get a 404.
#[derive(Default)]
pub struct StubFetcher {
    routes: Vec<(String, Reply)>,
    calls: Mutex<Vec<(String, Vec<(&'static str, String)>)>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, body: &str) -> Self {
        self.routes.push((prefix.to_string(), Reply::Body(body.to_string())));
        self
    }

    pub fn fail(mut self, prefix: &str, status: u16) -> Self {
        self.routes.push((prefix.to_string(), Reply::Status(status)));
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<(&'static str, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<String, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), headers.to_vec()));

        match self.routes.iter().find(|(prefix, _)| url.starts_with(prefix.as_str())) {
            Some((_, Reply::Body(body))) => Ok(body.clone()),
            Some((_, Reply::Status(status))) => Err(FetchError::Status { status: *status }),
            None => Err(FetchError::Status { status: 404 }),
        }
    }
}

/// Stub fetcher serving both built-in sites at their production URLs.
pub fn storefront_fetcher(pricing_body: &str) -> StubFetcher {
    StubFetcher::new()
        .route("https://www.bestbuy.com/pricing/", pricing_body)
        .route("https://www.bestbuy.com/site/", BESTBUY_PAGE)
        .route("https://www.newegg.com/", NEWEGG_PAGE)
}

pub fn stub_context(fetcher: StubFetcher) -> (ScrapeContext, Arc<StubFetcher>) {
    let fetcher = Arc::new(fetcher);
    let ctx = ScrapeContext::new(fetcher.clone(), Arc::new(FixedSessions));
    (ctx, fetcher)
}

pub fn header<'a>(headers: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
