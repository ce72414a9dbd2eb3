//! Best-effort loading of decorative Lottie animations.
//!
//! Nothing here can fail the caller: every error becomes `None`, and the
//! page renders a text placeholder instead.

use crate::config::AnimationConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Placeholder shown when an animation could not be loaded
pub const ANIMATION_FALLBACK: &str = "⚠️ Animation not available.";

/// Animations used across the screens
#[derive(Debug, Clone, Default)]
pub struct AnimationAssets {
    pub header: Option<Value>,
    pub safe: Option<Value>,
    pub alert: Option<Value>,
    pub logo: Option<Value>,
}

impl AnimationAssets {
    /// Fetch all four animations concurrently, once
    pub async fn load(config: &AnimationConfig) -> Self {
        if !config.enabled {
            info!("Animation loading disabled");
            return Self::default();
        }

        let fetcher = match AnimationFetcher::new(config.timeout()) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client for animations");
                return Self::default();
            }
        };

        let (header, safe, alert, logo) = futures::future::join4(
            fetcher.fetch(&config.header_url),
            fetcher.fetch(&config.safe_url),
            fetcher.fetch(&config.alert_url),
            fetcher.fetch(&config.logo_url),
        )
        .await;

        let assets = Self {
            header,
            safe,
            alert,
            logo,
        };
        info!(
            loaded = assets.loaded_count(),
            total = 4,
            "Animation assets loaded"
        );
        assets
    }

    pub fn loaded_count(&self) -> usize {
        [&self.header, &self.safe, &self.alert, &self.logo]
            .iter()
            .filter(|a| a.is_some())
            .count()
    }
}

/// HTTP fetcher for JSON animation payloads
pub struct AnimationFetcher {
    client: reqwest::Client,
}

impl AnimationFetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Fetch one animation; any failure yields `None`
    pub async fn fetch(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log_fetch_error(url, &e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Animation request returned non-success status");
            return None;
        }

        match response.json::<Value>().await {
            Ok(animation) => {
                debug!(url = %url, "Animation loaded");
                Some(animation)
            }
            Err(e) => {
                log_fetch_error(url, &e);
                None
            }
        }
    }
}

/// Network trouble and bad payloads are expected for a decorative remote
/// asset; anything else points at a bug or misconfiguration.
fn log_fetch_error(url: &str, e: &reqwest::Error) {
    if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() || e.is_decode() {
        warn!(url = %url, error = %e, "Animation unavailable");
    } else {
        error!(url = %url, error = %e, "Unexpected error fetching animation");
    }
}
