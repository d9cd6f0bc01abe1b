//! Streaming archive downloads

use super::{http_client, INACTIVITY_TIMEOUT};
use crate::error::{Result, ScaffoldError};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::debug;

/// Downloads a remote resource to a local file
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    inactivity_timeout: Duration,
}

impl Downloader {
    /// Create a downloader with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self::with_client(http_client(user_agent))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            inactivity_timeout: INACTIVITY_TIMEOUT,
        }
    }

    /// Override how long a download may go without receiving data
    pub fn with_inactivity_timeout(mut self, inactivity_timeout: Duration) -> Self {
        self.inactivity_timeout = inactivity_timeout;
        self
    }

    /// Stream `url` into `destination`, returning the number of bytes written
    ///
    /// The parent directory of `destination` must already exist. A non-success
    /// status leaves no file behind.
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        debug!(url, destination = %destination.display(), "starting download");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScaffoldError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(ScaffoldError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let mut file = fs::File::create(destination)
            .await
            .map_err(|e| ScaffoldError::fs("create", destination, e))?;
        let mut written: u64 = 0;

        loop {
            let chunk = match timeout(self.inactivity_timeout, response.chunk()).await {
                Ok(Ok(Some(chunk))) => chunk,
                Ok(Ok(None)) => break,
                Ok(Err(source)) => {
                    return Err(ScaffoldError::Transport {
                        url: url.to_string(),
                        source,
                    })
                }
                Err(_) => {
                    return Err(ScaffoldError::Timeout {
                        url: url.to_string(),
                        seconds: self.inactivity_timeout.as_secs(),
                    })
                }
            };

            file.write_all(&chunk)
                .await
                .map_err(|e| ScaffoldError::fs("write", destination, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| ScaffoldError::fs("write", destination, e))?;

        debug!(url, bytes = written, "download complete");
        Ok(written)
    }
}
