//! Keep retrying until the work eventually succeeds, looping externally on
//! an exhausted budget — the classic consumer shape for this executor.

use reattempt::prelude::*;
use std::io;
use std::time::Duration;

fn main() -> Result<(), RetryError<io::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reattempt=debug")),
        )
        .init();

    // Flaky work: succeeds on the seventh invocation overall, so the first
    // five-attempt session exhausts and the outer loop starts another.
    let mut calls = 0u32;
    let mut retry = Retry::builder()
        .attempts(5)
        .initial_delay(Duration::from_millis(50))
        .backoff(Backoff::Quadratic)
        .on_attempt_start(|event| println!("attempt {} starting", event.attempt))
        .on_attempt_failure(|event| println!("attempt {} failed", event.attempt))
        .build_sync(move || {
            calls += 1;
            Ok::<_, io::Error>(calls >= 7)
        });

    while !retry.run()? {
        println!("budget exhausted, starting another session");
    }

    println!("done");
    Ok(())
}
