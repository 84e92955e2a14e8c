use std::fmt;
use std::time::Duration;

/// Request-signing algorithm forced onto a client instead of the provider default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerOverride {
    /// SigV4 as applied to S3 requests
    S3V4,
}

impl SignerOverride {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerOverride::S3V4 => "AWSS3V4SignerType",
        }
    }
}

impl fmt::Display for SignerOverride {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport and client settings shared by every client a factory builds.
///
/// The factory keeps one of these as a template and hands each client its
/// own clone, so per-client tweaks such as [`SignerOverride`] never leak
/// back into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub user_agent: String,
    pub connection_timeout: Duration,
    pub socket_timeout: Duration,
    pub max_error_retry: u32,
    pub signer_override: Option<SignerOverride>,
}

impl Default for ClientConfiguration {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            connection_timeout: Duration::from_secs(10),
            socket_timeout: Duration::from_secs(50),
            max_error_retry: 3,
            signer_override: None,
        }
    }
}

impl ClientConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_socket_timeout(mut self, timeout: Duration) -> Self {
        self.socket_timeout = timeout;
        self
    }

    pub fn with_max_error_retry(mut self, retries: u32) -> Self {
        self.max_error_retry = retries;
        self
    }

    pub fn with_signer_override(mut self, signer: Option<SignerOverride>) -> Self {
        self.signer_override = signer;
        self
    }
}
