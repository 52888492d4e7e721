use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::types::SessionContext;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

/// Picks a plausible desktop browser user agent.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Serializes `Set-Cookie` header values into a single `Cookie` header.
///
/// Only the leading `name=value` pair of each header is kept; attributes such
/// as `Path` or `Expires` are dropped. A later cookie with the same name
/// replaces the earlier one in place.
pub fn cookie_header<'a>(set_cookies: impl IntoIterator<Item = &'a str>) -> String {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for raw in set_cookies {
        let first = raw.split(';').next().unwrap_or("").trim();
        let Some((name, value)) = first.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        match pairs.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => slot.1 = value,
            None => pairs.push((name.to_string(), value)),
        }
    }

    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Supplies the browser identity for one routine invocation.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn session_for(&self, origin: &str) -> SessionContext;
}

/// Generates a user agent and harvests cookies with a single GET to the site
/// origin.
#[derive(Clone)]
pub struct HttpSessionProvider {
    client: wreq::Client,
}

impl HttpSessionProvider {
    pub fn new(client: wreq::Client) -> Self {
        Self { client }
    }

    async fn harvest_cookies(&self, origin: &str, user_agent: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(origin)
            .header("User-Agent", user_agent)
            .send()
            .await?;

        let set_cookies = resp
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|v| v.to_str().ok());
        Ok(cookie_header(set_cookies))
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn session_for(&self, origin: &str) -> SessionContext {
        let user_agent = random_user_agent().to_string();

        let cookie_header = match self.harvest_cookies(origin, &user_agent).await {
            Ok(cookies) => {
                debug!(origin, has_cookies = !cookies.is_empty(), "harvested cookies");
                cookies
            }
            Err(e) => {
                warn!(origin, error = %e, "cookie harvest failed, continuing without cookies");
                String::new()
            }
        };

        SessionContext {
            user_agent,
            cookie_header,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_comes_from_pool() {
        for _ in 0..20 {
            assert!(USER_AGENTS.contains(&random_user_agent()));
        }
    }

    #[test]
    fn keeps_name_value_and_drops_attributes() {
        let header = cookie_header([
            "SID=abc123; Path=/; HttpOnly",
            "locale=en-US; Expires=Wed, 21 Oct 2026 07:28:00 GMT",
        ]);
        assert_eq!(header, "SID=abc123; locale=en-US");
    }

    #[test]
    fn later_cookie_replaces_earlier_one() {
        let header = cookie_header(["a=1", "b=2", "a=3"]);
        assert_eq!(header, "a=3; b=2");
    }

    #[test]
    fn skips_malformed_entries() {
        let header = cookie_header(["novalue", "=orphan", "ok=yes"]);
        assert_eq!(header, "ok=yes");
    }

    #[test]
    fn empty_input_gives_empty_header() {
        assert_eq!(cookie_header(std::iter::empty::<&str>()), "");
    }
}
