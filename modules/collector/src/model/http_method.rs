use std::str::FromStr;

use serde::Deserialize;

use crate::prelude::*;

/// Methods the fetcher is allowed to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "HEAD")]
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

impl TryFrom<&reqwest::Method> for HttpMethod {
    type Error = Error;

    fn try_from(value: &reqwest::Method) -> Result<Self> {
        if *value == reqwest::Method::GET {
            Ok(HttpMethod::Get)
        } else if *value == reqwest::Method::HEAD {
            Ok(HttpMethod::Head)
        } else {
            Err(Error::new(ErrorKind::InvalidMethod).message(value.as_str()))
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            _ => Err(Error::new(ErrorKind::InvalidMethod).message(s)),
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
