// ── Runtime client configuration ──
//
// Describes how to reach the Akamai APIs and how long GTM adapters wait
// for propagation. Built by the CLI from a config profile; core never
// reads files.

use std::time::Duration;

use akaform_api::{EdgeGridCredentials, TlsMode, TransportConfig};

/// Connection settings for one EdgeGrid account.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: EdgeGridCredentials,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Delay between GTM domain-status polls.
    pub gtm_poll_interval: Duration,
    /// Maximum number of GTM domain-status polls before giving up.
    pub gtm_poll_attempts: u32,
}

impl ClientConfig {
    pub fn new(credentials: EdgeGridCredentials) -> Self {
        Self {
            credentials,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            gtm_poll_interval: Duration::from_secs(15),
            gtm_poll_attempts: 40,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
