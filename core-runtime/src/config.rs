//! # Core Configuration Module
//!
//! Provides configuration management for the chart browser core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`CoreConfig`] instance holding the settings the proxy server and the
//! catalog client need. It enforces fail-fast validation so that a missing
//! upstream credential is caught at startup rather than on the first request.
//!
//! ## Required Settings
//!
//! - `musixmatch_api_key` - the upstream catalog API credential, attached as
//!   a query parameter to every upstream call
//! - `identity_base_url` - base URL of the external identity provider
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .musixmatch_api_key("secret")
//!     .identity_base_url("https://id.example.com/auth/v1")
//!     .build()
//!     .expect("Failed to build config");
//! assert_eq!(config.default_country, "US");
//! ```

use crate::error::{Error, Result};

/// Default base URL of the upstream catalog API.
pub const MUSIXMATCH_API_BASE: &str = "https://api.musixmatch.com/ws/1.1";

/// Country chart used when a session carries no country preference.
pub const DEFAULT_COUNTRY: &str = "US";

/// Core configuration for the chart browser.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// API key credential for the upstream catalog API (required).
    pub musixmatch_api_key: String,

    /// Base URL of the upstream catalog API. Overridable for tests.
    pub musixmatch_base_url: String,

    /// Base URL of the external identity provider (required).
    pub identity_base_url: String,

    /// Fallback chart country when no preference is available.
    pub default_country: String,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The API key is non-empty
    /// - Base URLs look like HTTP(S) endpoints
    /// - The default country is a two-letter code
    pub fn validate(&self) -> Result<()> {
        if self.musixmatch_api_key.trim().is_empty() {
            return Err(Error::Config(
                "Musixmatch API key cannot be empty. \
                 Set MUSIXMATCH_API_KEY or use .musixmatch_api_key() to provide it."
                    .to_string(),
            ));
        }

        for (name, url) in [
            ("musixmatch_base_url", &self.musixmatch_base_url),
            ("identity_base_url", &self.identity_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.default_country.len() != 2
            || !self.default_country.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(Error::Config(format!(
                "Default country must be a two-letter uppercase code, got '{}'",
                self.default_country
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// The builder validates required settings and provides actionable error
/// messages when something is missing.
#[derive(Default)]
pub struct CoreConfigBuilder {
    musixmatch_api_key: Option<String>,
    musixmatch_base_url: Option<String>,
    identity_base_url: Option<String>,
    default_country: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the upstream catalog API key (required).
    pub fn musixmatch_api_key(mut self, key: impl Into<String>) -> Self {
        self.musixmatch_api_key = Some(key.into());
        self
    }

    /// Overrides the upstream catalog base URL.
    ///
    /// Defaults to [`MUSIXMATCH_API_BASE`]. Mainly useful for pointing the
    /// client at a local stub during testing.
    pub fn musixmatch_base_url(mut self, url: impl Into<String>) -> Self {
        self.musixmatch_base_url = Some(url.into());
        self
    }

    /// Sets the identity provider base URL (required).
    pub fn identity_base_url(mut self, url: impl Into<String>) -> Self {
        self.identity_base_url = Some(url.into());
        self
    }

    /// Overrides the fallback chart country. Defaults to `"US"`.
    pub fn default_country(mut self, country: impl Into<String>) -> Self {
        self.default_country = Some(country.into());
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if a required setting is missing or a value fails
    /// validation.
    pub fn build(self) -> Result<CoreConfig> {
        let musixmatch_api_key = self.musixmatch_api_key.ok_or_else(|| {
            Error::Config(
                "Musixmatch API key is required. Use .musixmatch_api_key() to set it.".to_string(),
            )
        })?;

        let identity_base_url = self.identity_base_url.ok_or_else(|| {
            Error::Config(
                "Identity provider base URL is required. Use .identity_base_url() to set it."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            musixmatch_api_key,
            musixmatch_base_url: self
                .musixmatch_base_url
                .unwrap_or_else(|| MUSIXMATCH_API_BASE.to_string()),
            identity_base_url,
            default_country: self
                .default_country
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .musixmatch_api_key("test-key")
            .identity_base_url("https://id.example.com/auth/v1")
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = CoreConfig::builder()
            .identity_base_url("https://id.example.com")
            .build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("API key is required"));
    }

    #[test]
    fn test_builder_requires_identity_url() {
        let result = CoreConfig::builder().musixmatch_api_key("k").build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Identity provider base URL is required"));
    }

    #[test]
    fn test_builder_with_defaults() {
        let config = valid_builder().build().unwrap();

        assert_eq!(config.musixmatch_base_url, MUSIXMATCH_API_BASE);
        assert_eq!(config.default_country, "US");
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let result = valid_builder().musixmatch_api_key("   ").build();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let result = valid_builder().musixmatch_base_url("ftp://nope").build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("must be an http(s) URL"));
    }

    #[test]
    fn test_validate_rejects_bad_country() {
        let result = valid_builder().default_country("usa").build();

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("two-letter uppercase code"));
    }

    #[test]
    fn test_builder_with_overrides() {
        let config = valid_builder()
            .musixmatch_base_url("http://127.0.0.1:9999/ws/1.1")
            .default_country("DE")
            .build()
            .unwrap();

        assert_eq!(config.musixmatch_base_url, "http://127.0.0.1:9999/ws/1.1");
        assert_eq!(config.default_country, "DE");
    }
}
