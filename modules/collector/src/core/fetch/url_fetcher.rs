use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Method, Url, header::CONNECTION};

use crate::{
    base::Logger,
    model::{FetchResult, HttpMethod, ResponseMeta},
    prelude::*,
};

use super::FetchOption;

#[async_trait]
pub trait UrlFetcher {
    /// Issues one GET or HEAD request and buffers the whole body.
    ///
    /// Never fails as a call: every failure is reported through
    /// [`FetchResult::error`] next to whatever was obtained before it.
    async fn fetch(&self, url: &str, timeout: Duration, method: &Method) -> FetchResult;
}

pub struct UrlFetcherImpl {
    logger: Arc<dyn Logger + Send + Sync>,
    option: FetchOption,
}

impl UrlFetcherImpl {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, option: FetchOption) -> Self {
        Self { logger, option }
    }

    pub fn option(&self) -> &FetchOption {
        &self.option
    }

    // One client per request, with no idle pool, so connections are never reused.
    // A zero timeout disables the deadline.
    fn build_client(&self, timeout: Duration) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.option.accept_invalid_certs)
            .pool_max_idle_per_host(0)
            .no_proxy();

        if !timeout.is_zero() {
            builder = builder.timeout(timeout).connect_timeout(timeout).tcp_keepalive(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::new(ErrorKind::HttpClientError).message("failed to build http client").source(e))?;
        Ok(client)
    }
}

#[async_trait]
impl UrlFetcher for UrlFetcherImpl {
    async fn fetch(&self, url: &str, timeout: Duration, method: &Method) -> FetchResult {
        let parsed = match Url::parse(url) {
            Ok(v) => v,
            Err(e) => {
                self.logger.error(&format!("fetch error parsing url {url:?}: {e}"));
                return FetchResult::failed(None, Error::new(ErrorKind::InvalidUrl).message(url).source(e));
            }
        };

        let method = match HttpMethod::try_from(method) {
            Ok(v) => v,
            Err(e) => {
                self.logger.error(&e.to_string());
                return FetchResult::failed(None, e);
            }
        };

        let client = match self.build_client(timeout) {
            Ok(v) => v,
            Err(e) => {
                self.logger.error(&format!("fetch error creating client: {e}"));
                return FetchResult::failed(None, e);
            }
        };

        let res = client.request(method.into(), parsed).header(CONNECTION, "close").send().await;
        let res = match res {
            Ok(v) => v,
            Err(e) => {
                // Unreachable or dead hosts are routine when scanning.
                let e = Error::from(e);
                self.logger.warning(&format!("fetch client error {url}: {e}"));
                return FetchResult::failed(None, e);
            }
        };

        let meta = ResponseMeta::from_response(&res);

        match res.bytes().await {
            Ok(bytes) => FetchResult::ok(bytes, meta),
            Err(e) => {
                let e = if e.is_timeout() {
                    Error::new(ErrorKind::Timeout).message("timed out reading response body").source(e)
                } else {
                    Error::new(ErrorKind::BodyReadError).message("failed to read response body").source(e)
                };
                self.logger.warning(&format!("fetch body error {url}: {e}"));
                FetchResult::failed(Some(meta), e)
            }
        }
    }
}
