use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Placeholder title when the page has no recognizable title element.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Placeholder price when neither the page nor the pricing endpoint yields one.
pub const PRICE_UNAVAILABLE: &str = "N/A";

// ==================== REQUESTS ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub scraper_name: String,
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(scraper_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            scraper_name: scraper_name.into(),
            url: url.into(),
        }
    }
}

/// Browser identity used for one routine invocation. Built fresh per call and
/// dropped when the invocation finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user_agent: String,
    pub cookie_header: String,
}

// ==================== RESULTS ====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub product_id: String,
    pub price: String,
    pub url: String,
    pub scraper: String,
}

impl Product {
    pub fn has_title(&self) -> bool {
        self.title != UNKNOWN_TITLE
    }

    pub fn has_price(&self) -> bool {
        self.price != PRICE_UNAVAILABLE
    }
}

/// The uniform outcome of a dispatch. Serializes as either the product record
/// or `{"error": "..."}`, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeResult {
    Success(Product),
    Failure { error: String },
}

impl ScrapeResult {
    pub fn failure(error: impl Into<String>) -> Self {
        ScrapeResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeResult::Success(_))
    }

    pub fn product(&self) -> Option<&Product> {
        match self {
            ScrapeResult::Success(product) => Some(product),
            ScrapeResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScrapeResult::Success(_) => None,
            ScrapeResult::Failure { error } => Some(error),
        }
    }
}

impl From<Result<Product, ScrapeError>> for ScrapeResult {
    fn from(result: Result<Product, ScrapeError>) -> Self {
        match result {
            Ok(product) => ScrapeResult::Success(product),
            Err(e) => ScrapeResult::failure(e.to_string()),
        }
    }
}
