use tokio_util::bytes::Bytes;

use crate::prelude::*;

use super::{ResponseMeta, UrlCollectionData};

/// Outcome of a single fetch.
///
/// `bytes` is only meaningful when `error` is `None`; on every failure path
/// it is left empty. `response` is present whenever a response head arrived.
#[derive(Debug, Default)]
pub struct FetchResult {
    pub bytes: Bytes,
    pub response: Option<ResponseMeta>,
    pub error: Option<Error>,
}

impl FetchResult {
    pub fn ok(bytes: Bytes, response: ResponseMeta) -> Self {
        Self {
            bytes,
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(response: Option<ResponseMeta>, error: Error) -> Self {
        Self {
            bytes: Bytes::new(),
            response,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_collection_data<S: Into<String>>(self, url: S) -> UrlCollectionData {
        UrlCollectionData {
            url: url.into(),
            bytes: self.bytes,
            response: self.response,
            error: self.error,
        }
    }
}
