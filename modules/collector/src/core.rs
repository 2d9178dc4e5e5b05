mod collect;
mod fetch;

pub use collect::*;
pub use fetch::*;
