//! The retry executor and its builder.

use crate::backoff::Backoff;
use crate::error::RetryError;
use crate::event::{AttemptEvent, AttemptObserver, IgnoredObserver};
use crate::policy::{self, ErrorTag};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Boxed future produced by an async work callable.
pub type WorkFuture<E> = Pin<Box<dyn Future<Output = Result<bool, E>> + Send>>;

/// The work callable, bound to exactly one execution mode at construction.
enum Work<E> {
    Sync(Box<dyn FnMut() -> Result<bool, E> + Send>),
    Async(Box<dyn FnMut() -> WorkFuture<E> + Send>),
}

/// Bounded retry executor.
///
/// Re-invokes its work callable up to the configured attempt budget,
/// waiting a [`Backoff`]-shaped delay between attempts. The work reports
/// success with `Ok(true)` and a retryable failure with `Ok(false)`;
/// errors are swallowed or propagated per the configured policy.
///
/// Built via [`Retry::builder`]; the terminal `build_sync` / `build_async`
/// method fixes the execution mode for the executor's lifetime. Invoking
/// the wrong-mode run method fails fast without running any attempt.
///
/// A single executor may be run repeatedly; each run is an independent
/// session and no state carries over besides the configuration itself.
///
/// # Examples
///
/// ```rust
/// use reattempt::prelude::*;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), RetryError<std::io::Error>> {
/// let mut calls = 0u32;
/// let mut retry = Retry::builder()
///     .attempts(4)
///     .initial_delay(Duration::from_millis(1))
///     .build_sync(move || {
///         calls += 1;
///         Ok::<_, std::io::Error>(calls >= 3)
///     });
///
/// assert!(retry.run()?);
/// # Ok(())
/// # }
/// ```
pub struct Retry<E> {
    work: Work<E>,
    attempts: u32,
    initial_delay: Duration,
    backoff: Backoff,
    ignore_errors: bool,
    whitelist: Option<HashSet<String>>,
    blacklist: Option<HashSet<String>>,
    on_start: Vec<AttemptObserver>,
    on_failure: Vec<AttemptObserver>,
    on_ignored: Vec<IgnoredObserver<E>>,
}

impl<E> Retry<E> {
    /// Create a new builder with default configuration.
    ///
    /// Defaults: attempts=5, initial_delay=50ms, backoff=[`Backoff::Linear`],
    /// ignore_errors=false, no whitelist, no blacklist, no observers.
    pub fn builder() -> RetryBuilder<E> {
        RetryBuilder::default()
    }

    /// Total attempt budget.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Base wait unit fed into the backoff formula.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Configured backoff curve.
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether every work error is swallowed unconditionally.
    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors
    }

    /// Whether the bound work callable is asynchronous.
    pub fn is_async(&self) -> bool {
        matches!(self.work, Work::Async(_))
    }
}

impl<E> Retry<E>
where
    E: ErrorTag + std::error::Error,
{
    /// Drive the attempt loop synchronously, blocking the calling thread
    /// for the whole session including inter-attempt sleeps.
    ///
    /// Returns `Ok(true)` as soon as an attempt succeeds, `Ok(false)` when
    /// the attempt budget is exhausted, or `Err` for a propagated work
    /// error. Fails with [`RetryError::NotSynchronous`] if the executor
    /// was built with an async callable.
    pub fn run(&mut self) -> Result<bool, RetryError<E>> {
        let Work::Sync(ref mut work) = self.work else {
            return Err(RetryError::NotSynchronous);
        };

        for attempt in 1..=self.attempts {
            let event = AttemptEvent { attempt };
            trace!(attempt, "attempt start");
            for observer in &mut self.on_start {
                observer(event);
            }

            match work() {
                Ok(true) => {
                    debug!(attempt, "work succeeded");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(err) => {
                    if policy::should_propagate(
                        &err,
                        self.ignore_errors,
                        self.whitelist.as_ref(),
                        self.blacklist.as_ref(),
                    ) {
                        warn!(attempt, error = %err, "propagating work error");
                        return Err(RetryError::Work(err));
                    }
                    debug!(attempt, tag = err.tag(), error = %err, "swallowed work error");
                    for observer in &mut self.on_ignored {
                        observer(&err);
                    }
                }
            }

            for observer in &mut self.on_failure {
                observer(event);
            }

            // No wait after the final attempt.
            if attempt < self.attempts {
                let delay = self.backoff.wait_time(attempt, self.initial_delay);
                trace!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
                std::thread::sleep(delay);
            }
        }

        debug!(attempts = self.attempts, "attempt budget exhausted");
        Ok(false)
    }

    /// Drive the attempt loop asynchronously, suspending only at the work
    /// await point and the inter-attempt delay.
    ///
    /// Same outcome contract as [`Retry::run`]. Fails with
    /// [`RetryError::NotAsynchronous`] if the executor was built with a
    /// sync callable.
    pub async fn run_async(&mut self) -> Result<bool, RetryError<E>> {
        let Work::Async(ref mut work) = self.work else {
            return Err(RetryError::NotAsynchronous);
        };

        for attempt in 1..=self.attempts {
            let event = AttemptEvent { attempt };
            trace!(attempt, "attempt start");
            for observer in &mut self.on_start {
                observer(event);
            }

            match work().await {
                Ok(true) => {
                    debug!(attempt, "work succeeded");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(err) => {
                    if policy::should_propagate(
                        &err,
                        self.ignore_errors,
                        self.whitelist.as_ref(),
                        self.blacklist.as_ref(),
                    ) {
                        warn!(attempt, error = %err, "propagating work error");
                        return Err(RetryError::Work(err));
                    }
                    debug!(attempt, tag = err.tag(), error = %err, "swallowed work error");
                    for observer in &mut self.on_ignored {
                        observer(&err);
                    }
                }
            }

            for observer in &mut self.on_failure {
                observer(event);
            }

            // No wait after the final attempt.
            if attempt < self.attempts {
                let delay = self.backoff.wait_time(attempt, self.initial_delay);
                trace!(attempt, delay_ms = delay.as_millis() as u64, "backing off");
                tokio::time::sleep(delay).await;
            }
        }

        debug!(attempts = self.attempts, "attempt budget exhausted");
        Ok(false)
    }
}

impl<E> fmt::Debug for Retry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("attempts", &self.attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff", &self.backoff)
            .field("ignore_errors", &self.ignore_errors)
            .field("whitelist", &self.whitelist)
            .field("blacklist", &self.blacklist)
            .field("is_async", &self.is_async())
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`Retry`] executor.
///
/// The terminal [`build_sync`](RetryBuilder::build_sync) /
/// [`build_async`](RetryBuilder::build_async) method takes the work
/// callable, so an executor without work is unrepresentable.
///
/// # Examples
///
/// ```rust
/// use reattempt::prelude::*;
/// use std::time::Duration;
///
/// let retry = Retry::builder()
///     .attempts(3)
///     .initial_delay(Duration::from_millis(100))
///     .backoff(Backoff::Cubic)
///     .whitelist(["timed_out", "connection_reset"])
///     .build_sync(|| Ok::<_, std::io::Error>(true));
///
/// assert_eq!(retry.attempts(), 3);
/// ```
pub struct RetryBuilder<E> {
    attempts: Option<u32>,
    initial_delay: Option<Duration>,
    backoff: Option<Backoff>,
    ignore_errors: bool,
    whitelist: Option<HashSet<String>>,
    blacklist: Option<HashSet<String>>,
    on_start: Vec<AttemptObserver>,
    on_failure: Vec<AttemptObserver>,
    on_ignored: Vec<IgnoredObserver<E>>,
}

impl<E> Default for RetryBuilder<E> {
    fn default() -> Self {
        Self {
            attempts: None,
            initial_delay: None,
            backoff: None,
            ignore_errors: false,
            whitelist: None,
            blacklist: None,
            on_start: Vec::new(),
            on_failure: Vec::new(),
            on_ignored: Vec::new(),
        }
    }
}

impl<E> RetryBuilder<E> {
    /// Set the total attempt budget.
    ///
    /// The budget must be at least 1; a value of 0 is clamped to 1.
    ///
    /// Default: 5
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts.max(1));
        self
    }

    /// Set the base wait unit fed into the backoff formula.
    ///
    /// Default: 50ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the backoff curve shaping inter-attempt delays.
    ///
    /// Default: [`Backoff::Linear`]
    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Swallow every work error unconditionally, counting it as a failed
    /// attempt.
    ///
    /// Default: false
    pub fn ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Supply the whitelist of error-kind tags that are swallowed.
    ///
    /// When present, only errors whose tag is in this set are swallowed;
    /// all other errors propagate (subject to the blacklist clause, see
    /// the policy module).
    pub fn whitelist<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Supply the blacklist of error-kind tags.
    ///
    /// Per the literal policy this crate reproduces, a listed tag
    /// propagates and unlisted tags are swallowed when a blacklist is
    /// present. See the policy module and DESIGN.md.
    pub fn blacklist<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Register an observer for the attempt-start channel.
    ///
    /// Observers run synchronously on the retry loop's execution context,
    /// in registration order.
    pub fn on_attempt_start<F>(mut self, observer: F) -> Self
    where
        F: FnMut(AttemptEvent) + Send + 'static,
    {
        self.on_start.push(Box::new(observer));
        self
    }

    /// Register an observer for the attempt-failure channel.
    pub fn on_attempt_failure<F>(mut self, observer: F) -> Self
    where
        F: FnMut(AttemptEvent) + Send + 'static,
    {
        self.on_failure.push(Box::new(observer));
        self
    }

    /// Register an observer for the ignored-error channel, invoked with
    /// each swallowed work error before the attempt-failure notification.
    pub fn on_ignored_error<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.on_ignored.push(Box::new(observer));
        self
    }

    /// Bind a synchronous work callable and build the executor.
    pub fn build_sync<W>(self, work: W) -> Retry<E>
    where
        W: FnMut() -> Result<bool, E> + Send + 'static,
    {
        self.build(Work::Sync(Box::new(work)))
    }

    /// Bind an asynchronous work callable and build the executor.
    pub fn build_async<W, Fut>(self, mut work: W) -> Retry<E>
    where
        W: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool, E>> + Send + 'static,
    {
        self.build(Work::Async(Box::new(move || -> WorkFuture<E> {
            Box::pin(work())
        })))
    }

    fn build(self, work: Work<E>) -> Retry<E> {
        Retry {
            work,
            attempts: self.attempts.unwrap_or(5),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_millis(50)),
            backoff: self.backoff.unwrap_or_default(),
            ignore_errors: self.ignore_errors,
            whitelist: self.whitelist,
            blacklist: self.blacklist,
            on_start: self.on_start,
            on_failure: self.on_failure,
            on_ignored: self.on_ignored,
        }
    }
}
