//! Bounded worker pool over a task iterator (§9's single concurrency
//! abstraction): at most `max_in_flight` tasks running at once, results
//! collected once every task has finished, first error short-circuits the
//! collection (in-flight siblings are allowed to finish, but their results
//! are discarded and no further items are submitted past that point).
//!
//! Cropping and OCR both reduce to this one call: a list of pure
//! `(input) -> output` jobs, each run on a blocking thread so the async
//! runtime is never blocked by PDF/image/subprocess work.

use crate::PipelineError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs `f` over every item in `items`, at most `max_in_flight` at once.
/// Returns the results in submission order. The first `Err` returned by any
/// call to `f` is propagated; later results (even ones that already
/// succeeded) are dropped.
pub async fn run_bounded<T, R, F>(
    items: Vec<T>,
    max_in_flight: usize,
    f: F,
) -> Result<Vec<R>, PipelineError>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Result<R, PipelineError> + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let f = Arc::new(f);
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("pool semaphore is never closed");
        let f = f.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f(item)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .map_err(|e| PipelineError::TaskPanicked(e.to_string()))?;
        results.push(result?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_every_item_and_preserves_submission_order() {
        let items: Vec<i32> = (0..20).collect();
        let results = run_bounded(items, 4, |n| Ok(n * 2)).await.unwrap();
        let expected: Vec<i32> = (0..20).map(|n| n * 2).collect();
        assert_eq!(results, expected);
    }

    #[tokio::test]
    async fn never_exceeds_max_in_flight() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let items: Vec<i32> = (0..30).collect();

        let in_flight2 = in_flight.clone();
        let max_seen2 = max_seen.clone();
        run_bounded(items, 3, move |n| {
            let cur = in_flight2.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen2.fetch_max(cur, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            in_flight2.fetch_sub(1, Ordering::SeqCst);
            Ok(n)
        })
        .await
        .unwrap();

        assert!(max_seen.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn first_error_is_propagated() {
        let items: Vec<i32> = (0..10).collect();
        let result: Result<Vec<i32>, PipelineError> = run_bounded(items, 4, |n| {
            if n == 5 {
                Err(PipelineError::TaskPanicked("boom".into()))
            } else {
                Ok(n)
            }
        })
        .await;
        assert!(result.is_err());
    }
}
