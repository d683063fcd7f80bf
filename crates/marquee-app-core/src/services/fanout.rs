//! All-or-nothing concurrent fan-out.
//!
//! [`fan_out`] spawns one task per input on a [`JoinSet`], collects results
//! into slots indexed by input position, and returns on the first failure.
//! Returning drops the set, which aborts every task still in flight; their
//! results are discarded.  Completion order never affects output order.

use std::future::Future;

use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

#[derive(Debug, Error)]
pub enum FanOutError<E> {
    /// The task for input `index` returned an error.
    #[error("task {index} failed: {error}")]
    Task { index: usize, error: E },

    /// A task panicked or was cancelled.
    #[error("task join failed: {0}")]
    Join(#[from] JoinError),
}

/// Run `task` for every item concurrently; output `i` belongs to input `i`.
pub async fn fan_out<T, R, E, F, Fut>(items: Vec<T>, mut task: F) -> Result<Vec<R>, FanOutError<E>>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Send + 'static,
    E: Send + 'static,
{
    let len = items.len();
    let mut set = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let fut = task(item);
        set.spawn(async move { (index, fut.await) });
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(len).collect();
    while let Some(joined) = set.join_next().await {
        let (index, result) = joined?;
        match result {
            Ok(value) => slots[index] = Some(value),
            Err(error) => return Err(FanOutError::Task { index, error }),
        }
    }

    // Every spawned task was joined exactly once, so every slot is filled.
    debug_assert!(slots.iter().all(Option::is_some));
    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    #[tokio::test]
    async fn output_follows_input_order_not_completion_order() {
        // Earlier inputs finish later.
        let delays = vec![40u64, 30, 20, 10, 0];
        let out = fan_out(delays, |ms| async move {
            sleep(Duration::from_millis(ms)).await;
            Ok::<_, ()>(ms * 2)
        })
        .await
        .unwrap();
        assert_eq!(out, vec![80, 60, 40, 20, 0]);
    }

    #[tokio::test]
    async fn empty_input_is_empty_output() {
        let out: Vec<u8> = fan_out(Vec::<u8>::new(), |x| async move { Ok::<_, ()>(x) })
            .await
            .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn first_failure_aborts_the_rest() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finished);

        let err = fan_out(vec![0usize, 1, 2], move |i| {
            let counter = Arc::clone(&counter);
            async move {
                if i == 1 {
                    return Err(format!("boom {i}"));
                }
                sleep(Duration::from_millis(200)).await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(i)
            }
        })
        .await
        .unwrap_err();

        match err {
            FanOutError::Task { index, error } => {
                assert_eq!(index, 1);
                assert_eq!(error, "boom 1");
            }
            other => panic!("unexpected error: {other}"),
        }

        sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0, "siblings must be aborted");
    }

    #[tokio::test]
    async fn panicking_task_is_a_join_error() {
        let err = fan_out(vec![1u8], |_| async move {
            if true {
                panic!("task exploded");
            }
            Ok::<u8, ()>(0)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, FanOutError::Join(_)));
    }

    #[tokio::test]
    async fn every_item_is_run_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let out = fan_out((0..25).collect(), move |i: usize| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(i)
            }
        })
        .await
        .unwrap();
        assert_eq!(out, (0..25).collect::<Vec<_>>());
        assert_eq!(calls.load(Ordering::SeqCst), 25);
    }
}
