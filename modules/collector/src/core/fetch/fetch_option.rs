use serde::Deserialize;

/// Transport settings shared by every fetch issued through one fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchOption {
    /// Accept any server certificate, including self-signed and expired ones.
    /// Enabled by default since targets are arbitrary hosts.
    pub accept_invalid_certs: bool,
}

impl Default for FetchOption {
    fn default() -> Self {
        Self { accept_invalid_certs: true }
    }
}
