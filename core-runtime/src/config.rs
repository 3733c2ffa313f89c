//! # Sync Configuration
//!
//! Settings for a sync run, built through [`SyncSettingsBuilder`] with
//! fail-fast validation.
//!
//! Credentials are always passed in explicitly. Nothing in this module reads
//! the process environment; the invocation surface decides where values come
//! from.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::{FailureMode, SyncSettings};
//!
//! let settings = SyncSettings::builder()
//!     .base_url("https://acme-be.glean.com")
//!     .api_token("secret")
//!     .act_as("ops@acme.com")
//!     .failure_mode(FailureMode::Isolate)
//!     .max_concurrency(8)
//!     .build()
//!     .expect("valid settings");
//!
//! assert_eq!(settings.max_concurrency, 8);
//! ```
//!
//! ## Error Handling
//!
//! Missing credentials produce an actionable error:
//!
//! ```should_panic
//! use core_runtime::config::SyncSettings;
//!
//! let settings = SyncSettings::builder()
//!     .base_url("https://acme-be.glean.com")
//!     .build()
//!     .expect("Should fail - missing token and acting user");
//! ```

use crate::error::{Error, Result};
use crate::logging::redact_if_sensitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default number of configurations reconciled at the same time.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials and identity used for every platform request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    /// Platform base URL, without trailing slash
    pub base_url: String,

    /// Bearer token
    pub api_token: String,

    /// User the requests are made on behalf of
    pub act_as: String,
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("base_url", &self.base_url)
            .field("api_token", &redact_if_sensitive("api_token", &self.api_token))
            .field("act_as", &self.act_as)
            .finish()
    }
}

/// How a failing configuration affects the rest of its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Each failure becomes its own error entry; siblings are unaffected.
    #[default]
    Isolate,

    /// Run every configuration, then fail the whole batch on the first error.
    AbortBatch,
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMode::Isolate => write!(f, "isolate"),
            FailureMode::AbortBatch => write!(f, "abort-batch"),
        }
    }
}

impl FromStr for FailureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "isolate" => Ok(FailureMode::Isolate),
            "abort-batch" | "abort_batch" | "abort" => Ok(FailureMode::AbortBatch),
            other => Err(Error::Config(format!(
                "Unknown failure mode '{}', expected 'isolate' or 'abort-batch'",
                other
            ))),
        }
    }
}

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub credentials: ApiCredentials,

    /// Batch failure policy
    pub failure_mode: FailureMode,

    /// Maximum configurations reconciled concurrently
    pub max_concurrency: usize,

    /// Timeout applied to each platform request
    pub request_timeout: Duration,
}

impl SyncSettings {
    pub fn builder() -> SyncSettingsBuilder {
        SyncSettingsBuilder::default()
    }
}

/// Builder for [`SyncSettings`].
#[derive(Default)]
pub struct SyncSettingsBuilder {
    base_url: Option<String>,
    api_token: Option<String>,
    act_as: Option<String>,
    failure_mode: FailureMode,
    max_concurrency: Option<usize>,
    request_timeout: Option<Duration>,
}

impl SyncSettingsBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn act_as(mut self, user: impl Into<String>) -> Self {
        self.act_as = Some(user.into());
        self
    }

    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = Some(max);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validate and build the settings.
    ///
    /// # Errors
    ///
    /// - `MissingSetting` when the base URL, token or acting user is absent or blank
    /// - `Config` when the base URL is not http(s), or concurrency/timeout is zero
    pub fn build(self) -> Result<SyncSettings> {
        let base_url = require(
            "base_url",
            self.base_url,
            "Pass the platform URL, e.g. https://<instance>-be.glean.com",
        )?;
        let api_token = require(
            "api_token",
            self.api_token,
            "Pass an API token with collections scope",
        )?;
        let act_as = require(
            "act_as",
            self.act_as,
            "Pass the email of the user requests act on behalf of",
        )?;

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let max_concurrency = self.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY);
        if max_concurrency == 0 {
            return Err(Error::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        if request_timeout.is_zero() {
            return Err(Error::Config("request_timeout must be non-zero".to_string()));
        }

        Ok(SyncSettings {
            credentials: ApiCredentials {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_token,
                act_as,
            },
            failure_mode: self.failure_mode,
            max_concurrency,
            request_timeout,
        })
    }
}

fn require(setting: &str, value: Option<String>, hint: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingSetting {
            setting: setting.to_string(),
            message: hint.to_string(),
        }),
    }
}
