#[allow(unused)]
pub use crate::error::{Error, ErrorKind};

#[allow(unused)]
pub use crate::result::Result;

#[allow(unused)]
pub use tracing::{debug, error, info, trace, warn};
