#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Bounded retry with pluggable backoff and error-kind filtering.
//!
//! This crate provides a single abstraction, the [`Retry`](executor::Retry)
//! executor: it re-invokes a fallible unit of work up to a fixed attempt
//! budget, waiting an increasing delay between attempts. The work callable
//! reports success with `Ok(true)`, a retryable failure with `Ok(false)`,
//! or an error that is either swallowed or propagated depending on the
//! configured policy:
//!
//! - **Backoff curves** via [`Backoff`](backoff::Backoff) — linear,
//!   quadratic, or cubic growth of the inter-attempt delay
//! - **Error-kind filtering** via [`ErrorTag`](policy::ErrorTag) — swallow
//!   or propagate based on whitelist/blacklist tag sets
//! - **Lifecycle observers** — attempt-start, attempt-failure, and
//!   ignored-error callbacks delivered synchronously and in order
//! - **Sync and async execution** — the work callable is bound to one mode
//!   at construction; `run` blocks the thread, `run_async` suspends on the
//!   tokio runtime
//!
//! # Examples
//!
//! ```rust
//! use reattempt::prelude::*;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), RetryError<std::io::Error>> {
//! let mut remaining_failures = 2;
//! let mut retry = Retry::builder()
//!     .attempts(5)
//!     .initial_delay(Duration::from_millis(1))
//!     .backoff(Backoff::Quadratic)
//!     .build_sync(move || {
//!         remaining_failures -= 1;
//!         Ok::<_, std::io::Error>(remaining_failures == 0)
//!     });
//!
//! assert!(retry.run()?);
//! # Ok(())
//! # }
//! ```
//!
//! The async form is identical apart from the terminal builder method and
//! the awaited run:
//!
//! ```rust
//! use reattempt::prelude::*;
//!
//! # async fn example() -> Result<(), RetryError<std::io::Error>> {
//! let mut retry = Retry::builder()
//!     .attempts(3)
//!     .build_async(|| async { Ok::<_, std::io::Error>(true) });
//!
//! assert!(retry.run_async().await?);
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod error;
pub mod event;
pub mod executor;
pub mod options;
pub mod policy;

/// Convenient re-exports of commonly used items.
///
/// Import the whole surface with:
///
/// ```rust
/// use reattempt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backoff::Backoff;
    pub use crate::error::RetryError;
    pub use crate::event::AttemptEvent;
    pub use crate::executor::{Retry, RetryBuilder};
    pub use crate::options::RetryOptions;
    pub use crate::policy::ErrorTag;
}
