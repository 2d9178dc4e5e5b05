mod fetch_option;
mod url_fetcher;

pub use fetch_option::*;
pub use url_fetcher::*;
