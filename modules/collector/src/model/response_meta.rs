use reqwest::{StatusCode, Url, Version, header::HeaderMap};

/// Response head captured before the body is consumed.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Final URL of the response, after redirects.
    pub url: Url,
    pub status: StatusCode,
    /// Canonical reason phrase, `"Unknown"` for non-standard codes.
    pub status_text: String,
    pub version: Version,
    pub headers: HeaderMap,
    /// Value of the `Content-Length` header, if present and numeric.
    pub content_length: Option<u64>,
}

impl ResponseMeta {
    pub fn from_response(res: &reqwest::Response) -> Self {
        let status = res.status();
        let content_length = res
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        Self {
            url: res.url().clone(),
            status,
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            version: res.version(),
            headers: res.headers().clone(),
            content_length,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
