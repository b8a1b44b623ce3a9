//! Client configuration
//!
//! Holds the server location and the timings of the client. Values can be
//! deserialized (durations as milliseconds), taken from the environment, or
//! left at their defaults, and are always checked with `garde` before use.

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use web_time::Duration;

use crate::{
    constants::{http, notice, poll},
    error::{Error, Result},
};

/// Environment variable holding the server base URL
pub const ENV_BASE_URL: &str = "PHOTO_QUIZ_BASE_URL";
/// Environment variable holding the poll interval in milliseconds
pub const ENV_POLL_MS: &str = "PHOTO_QUIZ_POLL_MS";
/// Environment variable holding the request timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "PHOTO_QUIZ_TIMEOUT_MS";
/// Environment variable holding the notice duration in milliseconds
pub const ENV_NOTICE_MS: &str = "PHOTO_QUIZ_NOTICE_MS";

/// Validates that a duration falls within `[MIN_MS, MAX_MS]` milliseconds
fn validate_millis<const MIN_MS: u64, const MAX_MS: u64>(
    val: &Duration,
    _ctx: &(),
) -> garde::Result {
    let millis = u64::try_from(val.as_millis()).unwrap_or(u64::MAX);
    if (MIN_MS..=MAX_MS).contains(&millis) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_MS}ms,{MAX_MS}ms]"
        )))
    }
}

/// Validates that the base URL uses an HTTP scheme
fn validate_base_url(val: &str) -> garde::Result {
    if val.starts_with("http://") || val.starts_with("https://") {
        Ok(())
    } else {
        Err(garde::Error::new("must start with http:// or https://"))
    }
}

/// Settings of the photo quiz client
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the game server, without the `/api/` prefix
    #[garde(length(min = 1), custom(|v: &String, _: &()| validate_base_url(v)))]
    pub base_url: String,
    /// Delay between two scoreboard polls
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[garde(custom(validate_millis::<{ poll::MIN_INTERVAL_MS }, { poll::MAX_INTERVAL_MS }>))]
    pub poll_interval: Duration,
    /// Upper bound on a single request
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[garde(custom(validate_millis::<1, { http::DEFAULT_TIMEOUT_MS * 8 }>))]
    pub request_timeout: Duration,
    /// How long transient notices stay visible
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[garde(custom(validate_millis::<0, { notice::MAX_DURATION_MS }>))]
    pub notice_duration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: http::DEFAULT_BASE_URL.to_owned(),
            poll_interval: Duration::from_millis(poll::DEFAULT_INTERVAL_MS),
            request_timeout: Duration::from_millis(http::DEFAULT_TIMEOUT_MS),
            notice_duration: Duration::from_millis(notice::DEFAULT_DURATION_MS),
        }
    }
}

impl ClientConfig {
    /// Builds a configuration from the process environment
    ///
    /// Unset variables keep their default value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a variable is not a number or the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a value is not a number or the
    /// resulting configuration fails validation.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }

        let millis = |key: &str| -> Result<Option<Duration>> {
            lookup(key)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map(Duration::from_millis)
                        .map_err(|e| Error::Config(format!("invalid {key}: {e}")))
                })
                .transpose()
        };

        if let Some(poll_interval) = millis(ENV_POLL_MS)? {
            config.poll_interval = poll_interval;
        }
        if let Some(request_timeout) = millis(ENV_TIMEOUT_MS)? {
            config.request_timeout = request_timeout;
        }
        if let Some(notice_duration) = millis(ENV_NOTICE_MS)? {
            config.notice_duration = notice_duration;
        }

        config.checked()
    }

    /// Validates the configuration, returning it unchanged on success
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing every field that failed.
    pub fn checked(self) -> Result<Self> {
        self.validate()
            .map_err(|report| Error::Config(report.to_string()))?;
        Ok(self)
    }

    /// Full URL of an API endpoint such as `"next-photo"`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.trim_end_matches('/'),
            http::API_PREFIX,
            path
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_valid() {
        let config = ClientConfig::default().checked().unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
        assert_eq!(config.notice_duration, Duration::from_millis(3000));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://quiz.example/"),
            (ENV_POLL_MS, "2000"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://quiz.example");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(
            config.request_timeout,
            Duration::from_millis(http::DEFAULT_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_POLL_MS, "soon")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_poll_interval_bounds() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_POLL_MS, "10")]));
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ClientConfig::from_lookup(lookup(&[(ENV_POLL_MS, "250")]));
        assert!(result.is_ok());
    }

    #[test]
    fn test_base_url_scheme() {
        let result = ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "quiz.example")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint() {
        let config = ClientConfig {
            base_url: "http://host:9000/".to_owned(),
            ..ClientConfig::default()
        };
        assert_eq!(config.endpoint("next-photo"), "http://host:9000/api/next-photo");
    }

    #[test]
    fn test_deserialize_millis() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"poll_interval": 1750, "notice_duration": 0}"#).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(1750));
        assert_eq!(config.notice_duration, Duration::ZERO);
        assert_eq!(config.base_url, http::DEFAULT_BASE_URL);
    }
}
