//! Attempt lifecycle notifications.

use serde::Serialize;

/// Notification value emitted at the start of each attempt and again when
/// an attempt fails.
///
/// Events are delivered synchronously, in order, on the same execution
/// context as the retry loop; observers that block stall the whole
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptEvent {
    /// 1-based attempt number, bounded by the configured budget.
    pub attempt: u32,
}

/// Registered callback for attempt-start and attempt-failure channels.
pub(crate) type AttemptObserver = Box<dyn FnMut(AttemptEvent) + Send>;

/// Registered callback for the ignored-error channel.
pub(crate) type IgnoredObserver<E> = Box<dyn FnMut(&E) + Send>;
