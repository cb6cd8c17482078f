//! # Write Worker Pool
//!
//! A fixed-size pool of workers that executes database write jobs.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Write Executor                                     │
//! │                                                                         │
//! │  submit(fut) ──► bounded job queue ──► worker 1 ─┐                      │
//! │                        │               worker 2 ─┼──► run job, reply    │
//! │                        └──────────────► worker N ─┘    via oneshot      │
//! │                                                                         │
//! │  Workers share one receiver behind a mutex: whichever worker is idle    │
//! │  picks the next job. The queue is bounded, a burst of writes applies    │
//! │  backpressure on submit instead of growing without limit.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info};

use crate::error::{SyncError, SyncResult};

/// Default number of write workers.
pub const DEFAULT_WRITE_WORKERS: usize = 4;

/// Capacity of the job queue.
const JOB_QUEUE_SIZE: usize = 256;

/// A boxed unit of work.
type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Fixed-size pool of async workers for serializing database writes.
///
/// ## Usage
/// ```rust,ignore
/// let executor = WriteExecutor::new(4);
/// let result = executor
///     .submit(async move { repo.upsert_remote(&product).await })
///     .await?;
/// ```
#[derive(Clone)]
pub struct WriteExecutor {
    job_tx: mpsc::Sender<Job>,
    worker_count: usize,
}

impl WriteExecutor {
    /// Creates an executor with the given number of workers.
    ///
    /// A zero worker count is clamped to one: an executor that can never
    /// run a job would deadlock every submit.
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = mpsc::channel::<Job>(JOB_QUEUE_SIZE);
        let job_rx = Arc::new(Mutex::new(job_rx));

        for worker_id in 0..workers {
            let job_rx = job_rx.clone();
            tokio::spawn(async move {
                debug!(worker_id, "Write worker started");
                loop {
                    // Hold the lock only while taking a job, not while running it
                    let job = { job_rx.lock().await.recv().await };
                    match job {
                        Some(job) => job.await,
                        None => {
                            debug!(worker_id, "Write worker stopping");
                            break;
                        }
                    }
                }
            });
        }

        info!(workers, "Write executor started");
        WriteExecutor {
            job_tx,
            worker_count: workers,
        }
    }

    /// Returns the number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs a future on the pool and waits for its result.
    pub async fn submit<F, T>(&self, fut: F) -> SyncResult<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            let result = fut.await;
            // Caller may have given up waiting, that's fine
            let _ = result_tx.send(result);
        });

        self.job_tx
            .send(job)
            .await
            .map_err(|_| SyncError::ShuttingDown)?;

        result_rx.await.map_err(|_| SyncError::ShuttingDown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_submit_returns_result() {
        let executor = WriteExecutor::new(2);
        let result = executor.submit(async { 40 + 2 }).await.unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn test_zero_workers_clamped() {
        let executor = WriteExecutor::new(0);
        assert_eq!(executor.worker_count(), 1);
        // Still executes jobs
        let result = executor.submit(async { "ok" }).await.unwrap();
        assert_eq!(result, "ok");
    }

    #[tokio::test]
    async fn test_jobs_run_concurrently_across_workers() {
        let executor = WriteExecutor::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let executor = executor.clone();
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                executor
                    .submit(async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_submit_preserves_order_with_one_worker() {
        let executor = WriteExecutor::new(1);
        let log = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let log = log.clone();
            executor
                .submit(async move {
                    log.lock().await.push(i);
                })
                .await
                .unwrap();
        }

        assert_eq!(*log.lock().await, vec![0, 1, 2, 3, 4]);
    }
}
