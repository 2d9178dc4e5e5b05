mod base;
mod core;
mod error;
pub mod model;
mod prelude;

mod result {
    #[allow(unused)]
    pub type Result<T> = std::result::Result<T, crate::error::Error>;
}

pub use crate::base::{Logger, TracingLogger};
pub use crate::core::{CollectOption, FetchOption, UrlCollector, UrlFetcher, UrlFetcherImpl};
pub use error::*;
pub use result::*;
