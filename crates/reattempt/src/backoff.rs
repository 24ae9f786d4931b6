//! Wait-time growth curves for the retry loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Growth curve applied to the delay between attempts.
///
/// Given the configured initial delay `d` and the 1-based attempt number
/// `n`, the wait after attempt `n` is:
///
/// | Kind        | Formula         | d = 50ms           |
/// |-------------|-----------------|--------------------|
/// | `Linear`    | `d * n`         | 50, 100, 150, 200  |
/// | `Quadratic` | `d * 2^(n - 1)` | 50, 100, 200, 400  |
/// | `Cubic`     | `d * 3^(n - 1)` | 50, 150, 450, 1350 |
///
/// # Examples
///
/// ```rust
/// use reattempt::backoff::Backoff;
/// use std::time::Duration;
///
/// let delay = Backoff::Quadratic.wait_time(3, Duration::from_millis(50));
/// assert_eq!(delay, Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// Delay grows proportionally to the attempt number.
    #[default]
    Linear,
    /// Delay doubles with each attempt.
    Quadratic,
    /// Delay triples with each attempt.
    Cubic,
}

impl Backoff {
    /// Wait duration following the given 1-based attempt.
    ///
    /// Arithmetic saturates, so absurd attempt numbers yield a capped
    /// delay rather than overflowing.
    pub fn wait_time(self, attempt: u32, initial_delay: Duration) -> Duration {
        let base = initial_delay.as_millis().min(u128::from(u64::MAX)) as u64;
        let scale = attempt.saturating_sub(1);
        let millis = match self {
            Backoff::Linear => base.saturating_mul(u64::from(attempt)),
            Backoff::Quadratic => base.saturating_mul(2u64.saturating_pow(scale)),
            Backoff::Cubic => base.saturating_mul(3u64.saturating_pow(scale)),
        };
        Duration::from_millis(millis)
    }
}
