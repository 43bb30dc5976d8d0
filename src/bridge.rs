//! Blocking calls over asynchronous work.
//!
//! Action code is ordinary synchronous Rust, but the platform API is reached
//! through an async HTTP client. [`call_blocking`] hands the async work to a
//! dedicated worker thread with its own single-threaded tokio runtime and
//! parks the caller until the worker reports back.
//!
//! Guarantees:
//!
//! - the worker reports through a [`Completion`], which is consumed when it
//!   fires, so a call produces at most one outcome;
//! - the caller never depends on its own executor making progress, so it is
//!   safe to call from a plain thread or from inside a tokio runtime;
//! - the worker is always joined before `call_blocking` returns;
//! - a worker that dies without reporting yields
//!   [`WhiskError::NoResponse`] instead of a hang.

use std::future::Future;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::errors::WhiskError;

const WORKER_NAME: &str = "whisk-callback";

/// One-shot handle the worker uses to hand its outcome to the waiting caller.
struct Completion<T> {
    tx: mpsc::SyncSender<T>,
}

impl<T> Completion<T> {
    fn complete(self, value: T) {
        // Err here only means the caller is gone.
        let _ = self.tx.send(value);
    }
}

/// Run `task` to completion on a worker thread and block until it finishes.
///
/// `task` is called on the worker, so the future it builds does not need to
/// be `Send`. With a `timeout`, the future is dropped once the limit passes
/// and [`WhiskError::Timeout`] is returned; the worker still exits and is
/// joined.
///
/// # Example
///
/// ```rust
/// let value = whisk::bridge::call_blocking(None, || async { 40 + 2 }).unwrap();
/// assert_eq!(value, 42);
/// ```
pub fn call_blocking<T, F, Fut>(timeout: Option<Duration>, task: F) -> crate::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = T>,
{
    let (tx, rx) = mpsc::sync_channel::<crate::Result<T>>(1);
    let completion = Completion { tx };

    let worker = thread::Builder::new()
        .name(WORKER_NAME.to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    completion.complete(Err(WhiskError::NoResponse(format!(
                        "failed to start callback runtime: {}",
                        e
                    ))));
                    return;
                }
            };

            let outcome = runtime.block_on(async move {
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, task())
                        .await
                        .map_err(|_| WhiskError::Timeout(limit)),
                    None => Ok(task().await),
                }
            });

            completion.complete(outcome);
        })
        .map_err(|e| WhiskError::NoResponse(format!("failed to spawn callback worker: {}", e)))?;

    let received = rx.recv();

    if worker.join().is_err() {
        tracing::error!(worker = WORKER_NAME, "callback worker panicked");
    }

    match received {
        Ok(outcome) => outcome,
        Err(_) => Err(WhiskError::NoResponse(
            "callback worker exited without completing".to_string(),
        )),
    }
}
