mod collect_option;
mod url_collector;

pub use collect_option::*;
pub use url_collector::*;
