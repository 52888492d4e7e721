use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;

/// Request headers as `(name, value)` pairs, sent in order.
pub type Headers = Vec<(&'static str, String)>;

/// One GET, one attempt. Implementations may pool connections but must not
/// carry cookies or other state from one call into the next.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<String, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: wreq::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = wreq::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &wreq::Client {
        &self.client
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &[(&'static str, String)]) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "fetch rejected");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
