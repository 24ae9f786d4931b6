//! Swallow-or-propagate decision for work errors.
//!
//! Filtering is keyed on an explicit error-kind tag rather than runtime
//! type introspection: the work error type implements [`ErrorTag`] and the
//! executor matches that tag against optional whitelist/blacklist sets.

use std::collections::HashSet;

/// Stable kind tag used by the whitelist/blacklist filter.
///
/// Tags should be short, lowercase identifiers that stay stable across
/// releases — they are the values callers put in filter sets and config
/// files.
///
/// # Examples
///
/// ```rust
/// use reattempt::policy::ErrorTag;
///
/// #[derive(Debug)]
/// struct GatewayError {
///     transient: bool,
/// }
///
/// impl ErrorTag for GatewayError {
///     fn tag(&self) -> &str {
///         if self.transient { "transient" } else { "fatal" }
///     }
/// }
/// ```
pub trait ErrorTag {
    /// Kind tag identifying this error for filtering purposes.
    fn tag(&self) -> &str;
}

impl ErrorTag for std::io::Error {
    fn tag(&self) -> &str {
        use std::io::ErrorKind;
        match self.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::ConnectionRefused => "connection_refused",
            ErrorKind::ConnectionReset => "connection_reset",
            ErrorKind::ConnectionAborted => "connection_aborted",
            ErrorKind::NotConnected => "not_connected",
            ErrorKind::BrokenPipe => "broken_pipe",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::WouldBlock => "would_block",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidData => "invalid_data",
            ErrorKind::TimedOut => "timed_out",
            ErrorKind::WriteZero => "write_zero",
            ErrorKind::Interrupted => "interrupted",
            ErrorKind::UnexpectedEof => "unexpected_eof",
            _ => "other",
        }
    }
}

/// Decide whether a work error unwinds out of the retry loop.
///
/// With `ignore_errors` set, every error is swallowed. Otherwise the error
/// propagates iff its tag is outside the whitelist (when one is supplied)
/// AND inside the blacklist (when one is supplied).
///
/// The blacklist clause is carried over literally from the reference
/// behavior this crate reproduces: with only a blacklist supplied, a
/// listed kind propagates and unlisted kinds are swallowed. That reads as
/// the inverse of a usual denylist; see DESIGN.md before "fixing" it.
pub(crate) fn should_propagate<E: ErrorTag>(
    error: &E,
    ignore_errors: bool,
    whitelist: Option<&HashSet<String>>,
    blacklist: Option<&HashSet<String>>,
) -> bool {
    if ignore_errors {
        return false;
    }
    let tag = error.tag();
    let whitelisted = whitelist.map(|set| set.contains(tag));
    let blacklisted = blacklist.map(|set| set.contains(tag));
    whitelisted != Some(true) && blacklisted.unwrap_or(true)
}
