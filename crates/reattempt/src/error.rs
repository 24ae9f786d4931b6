//! Error taxonomy for retry sessions.

use thiserror::Error;

/// Terminal failure of a retry session.
///
/// Configuration errors (`NotSynchronous` / `NotAsynchronous`) are fatal
/// and raised before any attempt runs. `Work` carries a work error that
/// passed the filter, payload unchanged — no wrapping message and no
/// retry-count annotation.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// `run` was called on an executor bound to an async work callable.
    #[error("retry executor is not synchronous")]
    NotSynchronous,

    /// `run_async` was called on an executor bound to a sync work callable.
    #[error("retry executor is not asynchronous")]
    NotAsynchronous,

    /// A work error that the policy chose to propagate.
    #[error(transparent)]
    Work(#[from] E),
}
