use std::{fmt, sync::Arc, time::Duration};

use chrono::TimeDelta;
use spdlog::Logger;

/// Sandbox address
pub const TEST_API_URL: &str = "https://test-api.sumsub.com";

/// Production address
pub const API_URL: &str = "https://api.sumsub.com";

/// Tokens live 7 days on the service side; we count them as expired earlier.
pub const TOKEN_LIFETIME_HOURS: i64 = 150;

/// Everything needed to build an [`ApiClient`](crate::ApiClient).
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Applied to every request. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
    pub token_lifetime: TimeDelta,
    pub logger: Arc<Logger>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout: None,
            token_lifetime: TimeDelta::hours(TOKEN_LIFETIME_HOURS),
            logger: spdlog::default_logger(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_token_lifetime(mut self, lifetime: TimeDelta) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn with_logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = logger;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("token_lifetime", &self.token_lifetime)
            .finish_non_exhaustive()
    }
}
