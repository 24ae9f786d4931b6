//! End-to-end loop semantics: attempt counting, wait schedules, filtering,
//! and notification ordering across both execution modes.

use reattempt::prelude::*;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{tag} failure")]
struct FlakyError {
    tag: &'static str,
}

impl ErrorTag for FlakyError {
    fn tag(&self) -> &str {
        self.tag
    }
}

fn flaky(tag: &'static str) -> FlakyError {
    FlakyError { tag }
}

#[test]
fn trivial_outcomes_for_every_backoff_kind() {
    for backoff in [Backoff::Linear, Backoff::Quadratic, Backoff::Cubic] {
        let mut succeed = Retry::builder()
            .backoff(backoff)
            .build_sync(|| Ok::<_, FlakyError>(true));
        assert!(succeed.run().unwrap(), "{backoff:?}");

        let mut fail = Retry::builder()
            .backoff(backoff)
            .initial_delay(Duration::ZERO)
            .build_sync(|| Ok::<_, FlakyError>(false));
        assert!(!fail.run().unwrap(), "{backoff:?}");
    }
}

#[tokio::test]
async fn trivial_outcomes_for_every_backoff_kind_async() {
    for backoff in [Backoff::Linear, Backoff::Quadratic, Backoff::Cubic] {
        let mut succeed = Retry::builder()
            .backoff(backoff)
            .build_async(|| async { Ok::<_, FlakyError>(true) });
        assert!(succeed.run_async().await.unwrap(), "{backoff:?}");

        let mut fail = Retry::builder()
            .backoff(backoff)
            .initial_delay(Duration::ZERO)
            .build_async(|| async { Ok::<_, FlakyError>(false) });
        assert!(!fail.run_async().await.unwrap(), "{backoff:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn exhaustion_waits_once_per_non_final_attempt() {
    // Paused tokio time makes the wait schedule exact: four attempts wait
    // after the first three only.
    for (backoff, expected_ms) in [
        (Backoff::Linear, 50 + 100 + 150),
        (Backoff::Quadratic, 50 + 100 + 200),
        (Backoff::Cubic, 50 + 150 + 450),
    ] {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let mut retry = Retry::builder()
            .attempts(4)
            .initial_delay(Duration::from_millis(50))
            .backoff(backoff)
            .build_async(move || {
                let calls = Arc::clone(&calls_clone);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, FlakyError>(false)
                }
            });

        let started = tokio::time::Instant::now();
        assert!(!retry.run_async().await.unwrap());
        assert_eq!(
            started.elapsed(),
            Duration::from_millis(expected_ms),
            "{backoff:?}"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4, "{backoff:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt_never_waits() {
    let mut retry = Retry::builder()
        .initial_delay(Duration::from_secs(3600))
        .build_async(|| async { Ok::<_, FlakyError>(true) });

    let started = tokio::time::Instant::now();
    assert!(retry.run_async().await.unwrap());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn attempt_numbering_matches_invocation_count() {
    let starts = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(Mutex::new(Vec::new()));
    let starts_clone = Arc::clone(&starts);
    let failures_clone = Arc::clone(&failures);

    let mut retry = Retry::builder()
        .attempts(3)
        .initial_delay(Duration::ZERO)
        .on_attempt_start(move |event| starts_clone.lock().unwrap().push(event.attempt))
        .on_attempt_failure(move |event| failures_clone.lock().unwrap().push(event.attempt))
        .build_async(|| async { Ok::<_, FlakyError>(false) });

    assert!(!retry.run_async().await.unwrap());
    assert_eq!(*starts.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*failures.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn unfiltered_error_aborts_the_async_loop() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);

    let mut retry = Retry::builder()
        .initial_delay(Duration::ZERO)
        .build_async(move || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<bool, _>(flaky("fatal"))
            }
        });

    let err = retry.run_async().await.unwrap_err();
    assert!(matches!(err, RetryError::Work(FlakyError { tag: "fatal" })));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn whitelisted_errors_are_swallowed_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);
    let ignored = Arc::new(AtomicU32::new(0));
    let ignored_clone = Arc::clone(&ignored);

    let mut retry = Retry::builder()
        .attempts(5)
        .initial_delay(Duration::ZERO)
        .whitelist(["transient"])
        .on_ignored_error(move |_: &FlakyError| {
            ignored_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build_async(move || {
            let calls = Arc::clone(&calls_clone);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(flaky("transient"))
                } else {
                    Ok(true)
                }
            }
        });

    assert!(retry.run_async().await.unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(ignored.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn blacklist_follows_the_literal_filter() {
    // Literal policy: a listed tag propagates, unlisted tags are
    // swallowed while the blacklist is present.
    let mut listed = Retry::builder()
        .initial_delay(Duration::ZERO)
        .blacklist(["fatal"])
        .build_async(|| async { Err::<bool, _>(flaky("fatal")) });
    assert!(matches!(
        listed.run_async().await,
        Err(RetryError::Work(FlakyError { tag: "fatal" }))
    ));

    let mut unlisted = Retry::builder()
        .attempts(2)
        .initial_delay(Duration::ZERO)
        .blacklist(["fatal"])
        .build_async(|| async { Err::<bool, _>(flaky("transient")) });
    assert!(!unlisted.run_async().await.unwrap());
}

#[tokio::test]
async fn ignore_errors_swallows_everything_async() {
    let mut retry = Retry::builder()
        .attempts(3)
        .initial_delay(Duration::ZERO)
        .ignore_errors(true)
        .blacklist(["fatal"])
        .build_async(|| async { Err::<bool, _>(flaky("fatal")) });

    assert!(!retry.run_async().await.unwrap());
}

#[tokio::test]
async fn sync_executor_rejects_async_run() {
    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);

    let mut retry = Retry::builder().build_sync(move || {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Ok::<_, FlakyError>(true)
    });

    assert!(!retry.is_async());
    assert!(matches!(
        retry.run_async().await,
        Err(RetryError::NotAsynchronous)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // The right-mode run still works afterwards.
    assert!(retry.run().unwrap());
}

#[test]
fn options_document_drives_a_full_session() {
    let options: RetryOptions = serde_json::from_str(
        r#"{ "attempts": 2, "initial_delay_ms": 0, "whitelist": ["transient"] }"#,
    )
    .unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let calls_clone = Arc::clone(&calls);

    let mut retry = options.into_builder().build_sync(move || {
        calls_clone.fetch_add(1, Ordering::SeqCst);
        Err::<bool, _>(flaky("transient"))
    });

    assert!(!retry.run().unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
