use super::{after_last, until_any, ParsedPage, Storefront};
use crate::html_extractor::{strip_currency, PageExtractor};

pub const ORIGIN: &str = "https://www.newegg.com/";

const TITLE_SELECTOR: &str = "h1.product-title";
const PRICE_SELECTOR: &str = "div.product-price li.price-current";

/// Newegg renders title and price server-side; no secondary request.
#[derive(Debug, Clone)]
pub struct Newegg {
    origin: String,
}

impl Default for Newegg {
    fn default() -> Self {
        Self::with_origin(ORIGIN)
    }
}

impl Newegg {
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

impl Storefront for Newegg {
    const NAME: &'static str = "newegg";

    fn origin(&self) -> &str {
        &self.origin
    }

    fn parse_page(&self, html: &str) -> ParsedPage {
        let page = PageExtractor::new(html);
        ParsedPage {
            title: page.text_of(TITLE_SELECTOR),
            price: page
                .text_of(PRICE_SELECTOR)
                .map(|p| strip_currency(&p))
                .filter(|p| !p.is_empty()),
        }
    }

    /// The item number is the path segment after `/p/`, without the query.
    fn product_id(&self, url: &str) -> String {
        until_any(after_last(url, "/p/"), &['?']).to_string()
    }
}
