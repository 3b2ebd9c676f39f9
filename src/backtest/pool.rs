//! Bounded-concurrency worker pool

use futures_util::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Run `worker` over every item with at most `max_concurrency` in flight
///
/// Results come back in input order whatever the completion order. Runners
/// are futures driven by the calling task, not spawned tasks. Each one
/// claims the next index from a shared counter and keeps its own results,
/// which are placed into their slots once all runners finish. The worker
/// is infallible; failures must be encoded in `R`.
pub async fn run_pool<T, R, F, Fut>(items: &[T], max_concurrency: usize, worker: F) -> Vec<R>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = R>,
{
    run_pool_paced(items, max_concurrency, Duration::ZERO, worker).await
}

/// [`run_pool`] where each runner pauses for `pace` after every item
pub async fn run_pool_paced<T, R, F, Fut>(
    items: &[T],
    max_concurrency: usize,
    pace: Duration,
    worker: F,
) -> Vec<R>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = R>,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }

    let runners = max_concurrency.clamp(1, total);
    let next = AtomicUsize::new(0);
    let (next, worker) = (&next, &worker);

    let batches = join_all((0..runners).map(|_| async move {
        let mut done = Vec::new();
        loop {
            let idx = next.fetch_add(1, Ordering::Relaxed);
            if idx >= total {
                break;
            }
            done.push((idx, worker(&items[idx]).await));
            if !pace.is_zero() {
                tokio::time::sleep(pace).await;
            }
        }
        done
    }))
    .await;

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    for (idx, result) in batches.into_iter().flatten() {
        slots[idx] = Some(result);
    }
    slots.into_iter().flatten().collect()
}
