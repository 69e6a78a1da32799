//! Pooled, retrying HTTP transport shared by every provider adapter.
//!
//! Retry delay grows linearly: the nth retry waits `base_delay * n`,
//! not an exponential backoff. Sports APIs are rate-sensitive in a way
//! that benefits from a flat linear ramp, which is what the upstream
//! providers' own docs recommend.

use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::utils::jitter::generate_jitter_ms;

/// A pooled `reqwest::Client` plus the retry policy every provider call
/// goes through. One instance is built at startup and shared by all
/// adapters.
#[derive(Clone)]
pub struct ProviderHttpClient {
    client: reqwest::Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl ProviderHttpClient {
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(ProviderError::Transport)?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
        })
    }

    /// GET `url` and return the decoded JSON body, retrying transport
    /// and 5xx failures with a linear backoff.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_json<T>(&self, url: &str) -> ProviderResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get_json::<T>(url).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts && Self::is_retryable(&error) => {
                    let delay = self.base_delay * attempt + Duration::from_millis(generate_jitter_ms(100));
                    warn!(
                        "provider request to {} failed on attempt {}/{} ({}), retrying in {:?}",
                        url, attempt, self.max_attempts, error, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn try_get_json<T>(&self, url: &str) -> ProviderResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).send().await.map_err(|error| {
            if error.is_timeout() {
                ProviderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                ProviderError::Transport(error)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await.map_err(ProviderError::Transport)?;
        debug!("received {} bytes from {}", bytes.len(), url);
        serde_json::from_slice(&bytes).map_err(|error| ProviderError::ParseError {
            message: error.to_string(),
        })
    }

    fn is_retryable(error: &ProviderError) -> bool {
        matches!(
            error,
            ProviderError::Timeout { .. } | ProviderError::Transport(_)
        ) || matches!(error, ProviderError::Http { status, .. } if *status >= 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classifies_server_errors_but_not_client_errors() {
        assert!(ProviderHttpClient::is_retryable(&ProviderError::Http {
            status: 503,
            message: String::new(),
        }));
        assert!(!ProviderHttpClient::is_retryable(&ProviderError::Http {
            status: 404,
            message: String::new(),
        }));
        assert!(!ProviderHttpClient::is_retryable(
            &ProviderError::UnsupportedLeague {
                league: "nfl".to_string(),
            }
        ));
    }
}
