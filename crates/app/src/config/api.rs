//! API Config

use std::time::Duration;

use clap::Args;
use url::Url;

/// Backend API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Backend base URL
    #[arg(long, env = "FRUITCART_API_URL", default_value = "http://localhost:5000")]
    pub api_url: Url,

    /// Seconds between notification polls
    #[arg(long, env = "FRUITCART_POLL_INTERVAL_SECS", default_value_t = 60_u64)]
    pub poll_interval_secs: u64,
}

impl ApiConfig {
    /// Interval between notification polls, at least one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
