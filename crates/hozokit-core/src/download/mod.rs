//! Remote resources: release lookup and archive downloads
//!
//! Both the resolver and the downloader share one HTTP client so that every
//! request carries the product's user agent (GitHub rejects anonymous
//! requests without one).

pub mod fetcher;
pub mod release;

pub use fetcher::Downloader;
pub use release::{ReleaseInfo, ReleaseResolver};

use std::time::Duration;

/// Timeout for establishing a connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum time without receiving data before a download is abandoned
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

/// Build an HTTP client identifying itself with `user_agent`
pub fn http_client(user_agent: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
