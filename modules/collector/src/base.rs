mod log;
mod sync;
#[cfg(test)]
pub mod testkit;

pub use log::*;
pub use sync::*;
