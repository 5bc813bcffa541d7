use std::fmt;
use std::num::NonZero;
use std::thread::{self, JoinHandle};

use crossbeam::channel;
use tracing::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed set of worker threads that execute submitted jobs in submission order.
///
/// Each job runs to completion on one worker. With `N` workers, at most `N` jobs run at the
/// same time. Jobs are expected to handle their own panics; a job that panics takes its
/// worker down with it.
///
/// Dropping the pool waits for every submitted job to finish.
pub(crate) struct WorkerPool {
    job_tx: Option<channel::Sender<Job>>,
    join_handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub(crate) fn new(workers: NonZero<usize>) -> Self {
        let (job_tx, job_rx) = channel::unbounded::<Job>();

        let join_handles = (0..workers.get())
            .map(|worker_index| {
                let job_rx = job_rx.clone();

                thread::Builder::new()
                    .name(format!("process-sweep-w{worker_index}"))
                    .spawn(move || {
                        debug!(worker_index, "worker started");

                        // Ends once the pool drops its sender and the queue is drained.
                        for job in &job_rx {
                            job();
                        }

                        debug!(worker_index, "worker exiting");
                    })
                    .expect(
                        "failed to spawn worker thread: thread spawning failure is not supported",
                    )
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            join_handles,
        }
    }

    pub(crate) fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.job_tx
            .as_ref()
            .expect("type invariant - sender only taken on drop")
            .send(Box::new(job))
            .expect("type invariant - workers keep the receiver alive until the sender is dropped");
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.join_handles.len()
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.join_handles.len())
            .finish_non_exhaustive()
    }
}

impl Drop for WorkerPool {
    #[cfg_attr(test, mutants::skip)] // Impractical to test that stuff stops happening.
    fn drop(&mut self) {
        // Closing the channel lets the workers exit after the queue is drained.
        drop(self.job_tx.take());

        if thread::panicking() {
            return;
        }

        for join_handle in self.join_handles.drain(..) {
            // A worker only fails if a job panicked, which the owner of the job observes
            // through the job's own result channel.
            _ = join_handle.join();
        }
    }
}
