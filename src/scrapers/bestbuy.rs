use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{after_last, browser_headers, until_any, ParsedPage, ScrapeContext, Storefront};
use crate::fetch::Headers;
use crate::html_extractor::PageExtractor;
use crate::types::SessionContext;

pub const ORIGIN: &str = "https://www.bestbuy.com/";
pub const PRICING_ENDPOINT: &str = "https://www.bestbuy.com/pricing/v1/price/item";

const TITLE_SUFFIX: &str = "- Best Buy";
const VISITOR_ID: &str = "c706c8c0-3967-11ef-9760-128a771c0c87";
const PRICING_CLIENT_ID: &str = "lib-price-browser";

#[derive(Debug, Deserialize)]
struct PriceQuote {
    #[serde(rename = "currentPrice")]
    current_price: Option<serde_json::Value>,
}

/// Renders `currentPrice` as text. Numbers keep their JSON form and strings
/// are trimmed; anything else counts as missing.
fn price_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Best Buy renders prices client-side, so the page only supplies the title
/// and the price comes from the pricing API keyed by SKU.
#[derive(Debug, Clone)]
pub struct BestBuy {
    origin: String,
    pricing_endpoint: String,
}

impl Default for BestBuy {
    fn default() -> Self {
        Self::with_endpoints(ORIGIN, PRICING_ENDPOINT)
    }
}

impl BestBuy {
    pub fn with_endpoints(origin: impl Into<String>, pricing_endpoint: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            pricing_endpoint: pricing_endpoint.into(),
        }
    }

    pub fn pricing_url(&self, sku_id: &str) -> String {
        format!(
            "{}?allFinanceOffers=true&catalog=bby&context=offer-list\
             &effectivePlanPaidMemberType=NULL&includeOpenboxPrice=true\
             &paidMemberSkuInCart=false&salesChannel=LargeView\
             &skuId={}&useCabo=true&usePriceWithCart=true\
             &visitorId={}",
            self.pricing_endpoint,
            urlencoding::encode(sku_id),
            VISITOR_ID
        )
    }

    fn pricing_headers(session: &SessionContext) -> Headers {
        vec![
            ("User-Agent", session.user_agent.clone()),
            ("Accept", "application/json".to_string()),
            ("X-CLIENT-ID", PRICING_CLIENT_ID.to_string()),
        ]
    }
}

#[async_trait]
impl Storefront for BestBuy {
    const NAME: &'static str = "bestbuy";

    fn origin(&self) -> &str {
        &self.origin
    }

    fn page_headers(&self, session: &SessionContext) -> Headers {
        let mut headers = browser_headers(session);
        headers.push(("Sec-Fetch-Dest", "document".to_string()));
        headers.push(("Referer", self.origin.clone()));
        headers
    }

    fn parse_page(&self, html: &str) -> ParsedPage {
        let page = PageExtractor::new(html);
        let title = page
            .document_title()
            .map(|t| t.replace(TITLE_SUFFIX, "").trim().to_string())
            .filter(|t| !t.is_empty());

        ParsedPage { title, price: None }
    }

    /// The SKU is the trailing `skuId=` query value.
    fn product_id(&self, url: &str) -> String {
        until_any(after_last(url, "skuId="), &['&', '#']).to_string()
    }

    async fn resolve_price(
        &self,
        ctx: &ScrapeContext,
        _page: &ParsedPage,
        product_id: &str,
        session: &SessionContext,
    ) -> Option<String> {
        let api_url = self.pricing_url(product_id);
        let headers = Self::pricing_headers(session);

        let body = match ctx.fetcher.fetch(&api_url, &headers).await {
            Ok(body) => body,
            Err(e) => {
                warn!(sku = product_id, error = %e, "pricing request failed");
                return None;
            }
        };

        match serde_json::from_str::<PriceQuote>(&body) {
            Ok(quote) => quote.current_price.as_ref().and_then(price_text),
            Err(e) => {
                warn!(sku = product_id, error = %e, "pricing response is not valid JSON");
                None
            }
        }
    }
}
