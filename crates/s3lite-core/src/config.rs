//! Configuration for the s3lite protocol engine.
//!
//! [`S3LiteConfig`] carries the few knobs the protocol core needs: the base
//! host used for bucket/key resolution, the optional request-time check, the
//! listing ceiling, and the location of the user directory file. Values are
//! loaded from environment variables via [`S3LiteConfig::from_env`].

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::{S3LiteError, S3LiteResult};

/// Hard ceiling on the number of keys returned by a single listing page.
pub const MAX_KEYS_CEILING: usize = 1000;

/// s3lite configuration.
///
/// # Examples
///
/// ```
/// use s3lite_core::S3LiteConfig;
///
/// let config = S3LiteConfig::default();
/// assert_eq!(config.base_host, "localhost");
/// assert!(!config.check_request_time);
/// assert_eq!(config.max_request_skew_secs, 900);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3LiteConfig {
    /// Host that identifies path-style requests (e.g. `"s3.example.com"`).
    #[builder(default = String::from("localhost"))]
    pub base_host: String,

    /// Whether requests are rejected when their timestamp is outside the skew window.
    #[builder(default = false)]
    pub check_request_time: bool,

    /// Accepted distance, in seconds, between the request time and server time.
    #[builder(default = 900)]
    pub max_request_skew_secs: i64,

    /// Maximum number of keys returned by a single listing page.
    #[builder(default = MAX_KEYS_CEILING)]
    pub max_keys_ceiling: usize,

    /// Path of the user directory file, if any.
    #[builder(default, setter(strip_option))]
    pub user_file: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for S3LiteConfig {
    fn default() -> Self {
        Self {
            base_host: String::from("localhost"),
            check_request_time: false,
            max_request_skew_secs: 900,
            max_keys_ceiling: MAX_KEYS_CEILING,
            user_file: None,
            log_level: String::from("info"),
        }
    }
}

impl S3LiteConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `S3_BASE_HOST` | `localhost` |
    /// | `S3_CHECK_REQUEST_TIME` | `false` |
    /// | `S3_MAX_REQUEST_SKEW` | `900` |
    /// | `S3_MAX_KEYS` | `1000` |
    /// | `S3_USER_FILE` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("S3_BASE_HOST") {
            config.base_host = v;
        }
        if let Ok(v) = std::env::var("S3_CHECK_REQUEST_TIME") {
            config.check_request_time = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("S3_MAX_REQUEST_SKEW") {
            if let Ok(n) = v.parse::<i64>() {
                config.max_request_skew_secs = n;
            }
        }
        if let Ok(v) = std::env::var("S3_MAX_KEYS") {
            if let Ok(n) = v.parse::<usize>() {
                config.max_keys_ceiling = n;
            }
        }
        if let Ok(v) = std::env::var("S3_USER_FILE") {
            config.user_file = Some(v);
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> S3LiteResult<()> {
        if self.base_host.trim().is_empty() {
            return Err(S3LiteError::Config("base host must not be empty".to_owned()));
        }
        if self.max_request_skew_secs <= 0 {
            return Err(S3LiteError::Config(format!(
                "request skew window must be positive, got {}",
                self.max_request_skew_secs
            )));
        }
        Ok(())
    }

    /// The skew window to enforce, or `None` when the check is disabled.
    #[must_use]
    pub fn request_skew_window(&self) -> Option<i64> {
        self.check_request_time.then_some(self.max_request_skew_secs)
    }

    /// Listing ceiling, never above [`MAX_KEYS_CEILING`].
    #[must_use]
    pub fn effective_max_keys(&self) -> usize {
        self.max_keys_ceiling.min(MAX_KEYS_CEILING)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
