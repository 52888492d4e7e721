//! Resolves a scraper by name and runs it in its own task behind an
//! admission gate.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};

use crate::error::ScrapeError;
use crate::registry::Registry;
use crate::scrapers::ScrapeContext;
use crate::types::{Product, ScrapeRequest, ScrapeResult};

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    ctx: Arc<ScrapeContext>,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    /// `max_in_flight` bounds how many routines execute at once; extra
    /// dispatches wait for a slot. Zero is treated as one.
    pub fn new(registry: Registry, ctx: ScrapeContext, max_in_flight: usize) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx: Arc::new(ctx),
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn scrapers(&self) -> Vec<&'static str> {
        self.registry.list()
    }

    pub async fn dispatch(&self, name: &str, url: &str) -> Result<Product, ScrapeError> {
        let scraper = self
            .registry
            .resolve(name)
            .ok_or_else(|| ScrapeError::UnknownScraper(name.to_string()))?;

        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ScrapeError::Internal("dispatcher is shut down".to_string()))?;

        let started = Instant::now();
        let ctx = Arc::clone(&self.ctx);
        let task_url = url.to_string();
        let span = info_span!("scrape", scraper = name, url);

        // Held by the task, not the caller: an abandoned dispatch keeps its slot
        // until the routine finishes.
        let handle = tokio::spawn(
            async move {
                let _permit = permit;
                scraper.execute(&task_url, &ctx).await
            }
            .instrument(span),
        );

        let result = match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => {
                warn!(scraper = name, url, "scraper panicked");
                Err(ScrapeError::Internal(format!("scraper {} panicked", name)))
            }
            Err(e) => Err(ScrapeError::Internal(format!("scraper {} task failed: {}", name, e))),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(product) => info!(
                scraper = name,
                url,
                elapsed_ms,
                has_title = product.has_title(),
                has_price = product.has_price(),
                "scrape completed"
            ),
            Err(e) => info!(scraper = name, url, elapsed_ms, error = %e, "scrape failed"),
        }

        result
    }

    /// Error-shaped form of [`Dispatcher::dispatch`]; never fails.
    pub async fn run(&self, request: &ScrapeRequest) -> ScrapeResult {
        self.dispatch(&request.scraper_name, &request.url).await.into()
    }

    /// Dispatches every request concurrently. Results keep request order.
    pub async fn run_all(&self, requests: &[ScrapeRequest]) -> Vec<ScrapeResult> {
        join_all(requests.iter().map(|request| self.run(request))).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}
