//! Configuration-file surface for retry policy.
//!
//! [`RetryOptions`] is the plain-data mirror of the executor's
//! configuration, so retry policy can live in a service's config file and
//! be turned into a builder at the call site.

use crate::backoff::Backoff;
use crate::executor::{Retry, RetryBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deserializable retry configuration.
///
/// Every field is optional in the serialized form; missing fields take
/// the executor defaults.
///
/// # Examples
///
/// ```rust
/// use reattempt::prelude::*;
///
/// let options: RetryOptions = serde_json::from_str(
///     r#"{ "attempts": 3, "backoff": "cubic", "whitelist": ["timed_out"] }"#,
/// ).unwrap();
///
/// let retry = options
///     .into_builder()
///     .build_sync(|| Ok::<_, std::io::Error>(true));
/// assert_eq!(retry.attempts(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryOptions {
    /// Total attempt budget, at least 1.
    pub attempts: u32,
    /// Base wait unit in milliseconds.
    pub initial_delay_ms: u64,
    /// Backoff curve shaping inter-attempt delays.
    pub backoff: Backoff,
    /// Swallow every work error unconditionally.
    pub ignore_errors: bool,
    /// Error-kind tags that are swallowed when the set is present.
    pub whitelist: Option<Vec<String>>,
    /// Error-kind tags for the blacklist clause of the filter.
    pub blacklist: Option<Vec<String>>,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay_ms: 50,
            backoff: Backoff::Linear,
            ignore_errors: false,
            whitelist: None,
            blacklist: None,
        }
    }
}

impl RetryOptions {
    /// Convert into a [`RetryBuilder`] carrying this configuration.
    pub fn into_builder<E>(self) -> RetryBuilder<E> {
        let mut builder = Retry::builder()
            .attempts(self.attempts)
            .initial_delay(Duration::from_millis(self.initial_delay_ms))
            .backoff(self.backoff)
            .ignore_errors(self.ignore_errors);
        if let Some(tags) = self.whitelist {
            builder = builder.whitelist(tags);
        }
        if let Some(tags) = self.blacklist {
            builder = builder.blacklist(tags);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn empty_document_yields_defaults() {
        let options: RetryOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RetryOptions::default());
    }

    #[test]
    fn full_document_round_trips_into_a_builder() {
        let options: RetryOptions = serde_json::from_str(
            r#"{
                "attempts": 7,
                "initial_delay_ms": 10,
                "backoff": "quadratic",
                "ignore_errors": true,
                "blacklist": ["broken_pipe"]
            }"#,
        )
        .unwrap();

        let retry = options
            .into_builder()
            .build_sync(|| Ok::<_, io::Error>(false));

        assert_eq!(retry.attempts(), 7);
        assert_eq!(retry.initial_delay(), Duration::from_millis(10));
        assert_eq!(retry.backoff(), Backoff::Quadratic);
        assert!(retry.ignore_errors());
    }

    #[test]
    fn zero_attempts_in_config_still_clamps() {
        let options: RetryOptions = serde_json::from_str(r#"{ "attempts": 0 }"#).unwrap();
        let retry = options
            .into_builder()
            .build_sync(|| Ok::<_, io::Error>(false));
        assert_eq!(retry.attempts(), 1);
    }
}
