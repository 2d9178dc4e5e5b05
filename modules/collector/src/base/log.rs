use crate::prelude::*;

/// Leveled log sink handed to the fetcher and the collector.
///
/// The library never installs a subscriber or owns global logging state; the
/// embedding application decides where these lines end up.
pub trait Logger {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Forwards to `tracing`, tagging every event with the application name.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    app_name: String,
}

impl TracingLogger {
    pub fn new<S: AsRef<str>>(app_name: S) -> Self {
        Self {
            app_name: app_name.as_ref().to_string(),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        error!(app = self.app_name.as_str(), "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(app = self.app_name.as_str(), "{message}");
    }

    fn debug(&self, message: &str) {
        debug!(app = self.app_name.as_str(), "{message}");
    }
}
