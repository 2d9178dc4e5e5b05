use tokio_util::bytes::Bytes;

use crate::prelude::*;

use super::ResponseMeta;

/// Per-URL record produced by the collector.
///
/// `url` is the input string exactly as the caller supplied it, which may
/// differ from `response.url` after normalization or redirects.
#[derive(Debug)]
pub struct UrlCollectionData {
    pub url: String,
    pub bytes: Bytes,
    pub response: Option<ResponseMeta>,
    pub error: Option<Error>,
}

impl UrlCollectionData {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.response.as_ref().map(|r| r.status)
    }
}
