//! Client configuration

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Hosted backend used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://vyasa-backend.onrender.com";

/// Client configuration for connecting to the Vyasa backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://vyasa-backend.onrender.com")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Session file; in-memory session storage when unset
    pub session_file: Option<PathBuf>,

    /// Retries for idempotent reads after a transient failure
    pub read_retries: u32,

    /// First retry delay, doubled per attempt and capped at 30s
    pub retry_base_delay: Duration,

    /// Cached reads older than this are refetched; `None` keeps them until invalidated
    pub cache_stale_after: Option<Duration>,

    /// Google OAuth redirect URI
    pub google_redirect_uri: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given backend
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            session_file: None,
            read_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            cache_stale_after: None,
            google_redirect_uri: None,
        }
    }

    /// Read `VYASA_*` variables from the process environment
    ///
    /// Unset variables keep their defaults; unparsable numbers are a
    /// configuration error.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with variables taken from `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = var("VYASA_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let mut config = Self::new(base_url);

        if let Some(timeout) = parse_number("VYASA_REQUEST_TIMEOUT_SECS", var)? {
            config.timeout = timeout;
        }
        if let Some(retries) = parse_number("VYASA_READ_RETRIES", var)? {
            config.read_retries = retries;
        }
        if let Some(stale) = parse_number::<u64>("VYASA_CACHE_STALE_SECS", var)? {
            config.cache_stale_after = (stale > 0).then(|| Duration::from_secs(stale));
        }
        if let Some(path) = var("VYASA_SESSION_FILE") {
            config.session_file = Some(PathBuf::from(path));
        }
        if let Some(uri) = var("VYASA_GOOGLE_REDIRECT_URI") {
            config.google_redirect_uri = Some(uri);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Persist the session in a JSON file
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Set the retry budget for reads
    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    /// Set the first retry delay
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Expire cached reads after `after`
    pub fn with_cache_stale_after(mut self, after: Duration) -> Self {
        self.cache_stale_after = Some(after);
        self
    }

    /// Set where the Google OAuth flow lands
    pub fn with_google_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.google_redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Base URL without trailing slash
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Where the OAuth provider sends the user back
    pub fn google_redirect_uri(&self) -> String {
        self.google_redirect_uri
            .clone()
            .unwrap_or_else(|| format!("{}/auth/callback/google", self.api_base()))
    }

    /// Check the configuration before building a client
    pub fn validate(&self) -> ClientResult<()> {
        if self.api_base().trim().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".into()));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn parse_number<T: FromStr>(
    name: &str,
    var: impl Fn(&str) -> Option<String>,
) -> ClientResult<Option<T>> {
    var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ClientError::Config(format!("{name} is not a valid number: {raw}")))
        })
        .transpose()
}
