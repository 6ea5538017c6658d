//! Bounded fan-out: run one task per input with at most `limit` in flight,
//! then collect every result before returning.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::warn;

/// Why an input produced no value.
#[derive(Debug)]
pub enum TaskFailure<E> {
    Failed(E),
    /// The task ended without reporting, e.g. it panicked.
    Lost,
}

impl<E: fmt::Display> fmt::Display for TaskFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFailure::Failed(e) => write!(f, "{e}"),
            TaskFailure::Lost => f.write_str("task ended without a result"),
        }
    }
}

/// Every input ends up in exactly one of the two lists.
#[derive(Debug)]
pub struct BoundedMapOutcome<K, T, E> {
    pub succeeded: Vec<(K, T)>,
    pub failed: Vec<(K, TaskFailure<E>)>,
}

impl<K, T, E> BoundedMapOutcome<K, T, E> {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Applies `f` to every input concurrently, holding a semaphore permit per
/// running task. Success and failure are reported on separate channels and
/// drained until all `inputs.len()` results are in or every sender is gone.
///
/// Tasks live in a `JoinSet` owned by this future. Dropping the future aborts
/// every queued and running task.
pub async fn bounded_map<K, T, E, F, Fut>(inputs: Vec<K>, limit: usize, f: F) -> BoundedMapOutcome<K, T, E>
where
    K: Clone + Eq + Hash + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let total = inputs.len();
    let mut outcome = BoundedMapOutcome {
        succeeded: Vec::with_capacity(total),
        failed: Vec::new(),
    };
    if total == 0 {
        return outcome;
    }

    let permits = Arc::new(Semaphore::new(limit.clamp(1, total)));
    let (ok_tx, mut ok_rx) = mpsc::channel::<(K, T)>(total);
    let (err_tx, mut err_rx) = mpsc::channel::<(K, E)>(total);
    let mut tasks = JoinSet::new();

    for input in inputs.iter().cloned() {
        let permits = Arc::clone(&permits);
        let ok_tx = ok_tx.clone();
        let err_tx = err_tx.clone();
        let task = f(input.clone());

        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            // Receivers outlive every task, so a failed send cannot happen.
            match task.await {
                Ok(value) => {
                    let _ = ok_tx.send((input, value)).await;
                }
                Err(error) => {
                    let _ = err_tx.send((input, error)).await;
                }
            }
        });
    }
    drop(ok_tx);
    drop(err_tx);

    let mut reported = HashSet::with_capacity(total);
    let (mut ok_open, mut err_open) = (true, true);
    while reported.len() < total && (ok_open || err_open) {
        tokio::select! {
            received = ok_rx.recv(), if ok_open => match received {
                Some((key, value)) => {
                    reported.insert(key.clone());
                    outcome.succeeded.push((key, value));
                }
                None => ok_open = false,
            },
            received = err_rx.recv(), if err_open => match received {
                Some((key, error)) => {
                    reported.insert(key.clone());
                    outcome.failed.push((key, TaskFailure::Failed(error)));
                }
                None => err_open = false,
            },
        }
    }

    for key in inputs {
        if !reported.contains(&key) {
            warn!("Fan-out task ended without reporting a result");
            reported.insert(key.clone());
            outcome.failed.push((key, TaskFailure::Lost));
        }
    }

    outcome
}
