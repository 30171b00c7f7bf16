//! Configuration loaded from environment variables.
//!
//! All settings come from environment variables, optionally read from a
//! `.env` file via `dotenvy`. Missing values fall back to defaults that
//! point at a sandbox backend on the local machine.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::ClientError;

/// Default API root used when `OPTICA_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000/api";

/// Default sandbox bind address used when `OPTICA_SANDBOX_ADDR` is unset.
pub const DEFAULT_SANDBOX_ADDR: &str = "127.0.0.1:3000";

/// Settings for talking to the REST backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; resource paths are joined onto it.
    pub base_url: Url,

    /// Bearer token sent in the `Authorization` header, if any.
    pub token: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Change events buffered per subscriber of each resource service.
    pub change_event_capacity: usize,
}

impl ClientConfig {
    /// Builds a configuration for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            timeout: Duration::from_secs(15),
            change_event_capacity: 256,
        })
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `OPTICA_API_URL` is set but is
    /// not an absolute http(s) URL.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("OPTICA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token = std::env::var("OPTICA_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let timeout = Duration::from_secs(parse_env("OPTICA_TIMEOUT_SECS", 15));
        let change_event_capacity = parse_env("OPTICA_CHANGE_EVENT_CAPACITY", 256);

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            token,
            timeout,
            change_event_capacity,
        })
    }
}

/// Settings for the in-memory sandbox backend.
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Token every request must present, if any.
    pub token: Option<String>,

    /// JSON file with initial records keyed by resource path.
    pub seed_path: Option<PathBuf>,

    /// Request timeout enforced by the server.
    pub request_timeout: Duration,
}

impl SandboxConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `OPTICA_SANDBOX_ADDR` is set but
    /// cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let raw_addr = std::env::var("OPTICA_SANDBOX_ADDR")
            .unwrap_or_else(|_| DEFAULT_SANDBOX_ADDR.to_string());
        let listen_addr = raw_addr
            .parse()
            .map_err(|e| ClientError::Config(format!("OPTICA_SANDBOX_ADDR '{raw_addr}': {e}")))?;
        let token = std::env::var("OPTICA_SANDBOX_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let seed_path = std::env::var("OPTICA_SANDBOX_SEED").ok().map(PathBuf::from);
        let request_timeout = Duration::from_secs(parse_env("OPTICA_SANDBOX_TIMEOUT_SECS", 10));

        Ok(Self {
            listen_addr,
            token,
            seed_path,
            request_timeout,
        })
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            token: None,
            seed_path: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Parses an API root. A trailing slash is added so relative resource
/// paths join under it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)
        .map_err(|e| ClientError::Config(format!("invalid API URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::Config(format!(
            "unsupported API URL scheme '{other}'"
        ))),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
#[must_use]
pub fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
