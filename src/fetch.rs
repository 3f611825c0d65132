//! download module source text

use std::{future::Future, pin::Pin, time::Duration};

use reqwest::header::USER_AGENT;
use tokio::time::sleep;
use url::Url;

use crate::error::ImtError;

pub const MY_USER_AGENT: &str = concat!("imt/", env!("CARGO_PKG_VERSION"));

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ImtError>> + Send + 'a>>;

/// Retrieves the full body of an absolute module url.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ImtError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImtError::Fetch {
                url: String::new(),
                status: None,
                cause: e.to_string(),
            })?;

        Ok(Self {
            client,
            user_agent: user_agent.to_owned(),
        })
    }

    async fn down(&self, url: &Url) -> Result<String, ImtError> {
        let failed = |status: Option<u16>, cause: String| ImtError::Fetch {
            url: url.to_string(),
            status,
            cause,
        };

        let response = self
            .client
            .get(url.clone())
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await
            .map_err(|e| failed(None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(Some(status.as_u16()), format!("status {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| failed(Some(status.as_u16()), e.to_string()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a> {
        Box::pin(self.down(url))
    }
}

/// Retries transport failures and server errors with a linear backoff.
pub struct RetryFetcher<F> {
    inner: F,
    retries: u32,
    backoff: Duration,
}

impl<F: Fetcher> RetryFetcher<F> {
    pub fn new(inner: F, retries: u32) -> Self {
        Self {
            inner,
            retries,
            backoff: Duration::from_millis(200),
        }
    }

    #[cfg(test)]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

fn retryable(error: &ImtError) -> bool {
    match error {
        ImtError::Fetch { status: None, .. } => true,
        ImtError::Fetch {
            status: Some(status),
            ..
        } => *status >= 500,
        _ => false,
    }
}

impl<F: Fetcher> Fetcher for RetryFetcher<F> {
    fn fetch<'a>(&'a self, url: &'a Url) -> FetchFuture<'a> {
        Box::pin(async move {
            let mut attempt = 0;
            loop {
                match self.inner.fetch(url).await {
                    Err(e) if attempt < self.retries && retryable(&e) => {
                        attempt += 1;
                        log::warn!("{e}, retrying ({attempt}/{})", self.retries);
                        sleep(self.backoff * attempt).await;
                    }
                    result => return result,
                }
            }
        })
    }
}
