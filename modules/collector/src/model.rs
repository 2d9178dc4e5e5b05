mod fetch_result;
mod http_method;
mod response_meta;
mod url_collection_data;

pub use fetch_result::*;
pub use http_method::*;
pub use response_meta::*;
pub use url_collection_data::*;
