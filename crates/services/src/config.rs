use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use practice_core::feedback::DEFAULT_REGRESSION_MARKER;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Where the exercise backend lives.
#[derive(Clone)]
pub struct ApiConfig {
    base_url: Url,
    timeout: Duration,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            raw: base_url.to_string(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
        }
        // Relative endpoint joins need a directory-style base path.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Read `PRACTICE_API_URL` and `PRACTICE_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("PRACTICE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(&base_url)?;
        if let Ok(raw) = env::var("PRACTICE_API_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Client-side knobs for a practice session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    regression_markers: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            regression_markers: vec![DEFAULT_REGRESSION_MARKER.to_string()],
        }
    }
}

impl SessionConfig {
    /// Substrings that mark a level-change message as a level-down.
    #[must_use]
    pub fn with_regression_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regression_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn regression_markers(&self) -> &[String] {
        &self.regression_markers
    }
}
