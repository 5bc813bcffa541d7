use std::num::NonZero;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel;
use new_zealand::nz;
use param_space::{Shape, Space};
use tracing::{debug, error, trace};

use crate::invoke::{Invoker, Outcome};
use crate::pal::PlatformFacade;
use crate::pool::WorkerPool;
use crate::{ContextRegistry, Lifecycle, Record, panic_message};

/// Default interval between liveness checks of a monitored child process.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Default prefix of the names of scratch directories.
pub const DEFAULT_SCRATCH_PREFIX: &str = "process-sweep-";

/// Runs one external process per point of a parameter space and collects a [`Record`] from
/// each.
///
/// Every generated assignment becomes one task. A task gets a fresh instance of the
/// [`Lifecycle`] implementation, a fresh scratch directory and one child process. Tasks run
/// concurrently on a fixed number of worker threads, each of which runs at most one child
/// process at a time.
///
/// # Example
///
/// ```no_run
/// use std::num::NonZero;
/// use std::time::Duration;
///
/// use process_sweep::Runner;
///
/// let runner = Runner::builder()
///     .processes(NonZero::new(4).unwrap())
///     .poll_interval(Duration::from_millis(2))
///     .build();
///
/// assert_eq!(runner.processes().get(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Runner {
    processes: NonZero<usize>,
    invoker: Invoker,
}

impl Runner {
    /// Creates a runner with default settings.
    ///
    /// Use [`Runner::builder()`] for custom configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring the runner.
    #[must_use]
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    /// The number of child processes that may run at the same time.
    #[must_use]
    pub fn processes(&self) -> NonZero<usize> {
        self.processes
    }

    /// Runs one task per assignment generated from `space` in the given `shape`, using a
    /// default-constructed `C` for each task.
    ///
    /// Returns once every task has completed. See [`run_with()`](Self::run_with).
    pub fn run<C, V>(&self, space: &Space<V>, shape: Shape) -> Vec<Record>
    where
        C: Lifecycle<V> + Default + 'static,
        V: Clone + Send + Sync + 'static,
    {
        self.run_with(space, shape, C::default)
    }

    /// Runs one task per assignment generated from `space` in the given `shape`, using an
    /// instance created by `factory` for each task.
    ///
    /// Returns the record reported by [`Lifecycle::data()`] of each task, in the order the
    /// assignments were generated. Tasks whose process could not be started or whose hooks
    /// panicked are included.
    ///
    /// The instances need not be `Send`. Each is created and used on one dedicated thread,
    /// so `factory` runs on that thread too.
    ///
    /// A panic in `pre()`, `argv()` or `post()` is reported to the task's
    /// [`Lifecycle::error()`] as [`InvokeError::Hook`][crate::InvokeError::Hook]. A panic in
    /// `success()` or `error()` is logged and the task still contributes its record.
    ///
    /// # Panics
    ///
    /// Resumes the panic of a [`Lifecycle::data()`] call, or of the `factory`, once every
    /// task has finished, as no record can be produced for that task.
    pub fn run_with<C, V, F>(&self, space: &Space<V>, shape: Shape, factory: F) -> Vec<Record>
    where
        C: Lifecycle<V> + 'static,
        V: Clone + Send + Sync + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let started = Instant::now();

        let mut registry = ContextRegistry::new(self.processes, factory);
        let pool = WorkerPool::new(self.processes);
        let invoker = Arc::new(self.invoker.clone());

        let (outcome_tx, outcome_rx) = channel::unbounded();

        let handles: Vec<_> = space
            .assignments(shape)
            .enumerate()
            .map(|(index, assignment)| {
                let handle = registry.create();

                trace!(index, "scheduling task");

                let invoker = Arc::clone(&invoker);
                let task_handle = handle.clone();
                let outcome_tx = outcome_tx.clone();

                pool.execute(move || {
                    let outcome = invoker.invoke(&task_handle, assignment);

                    // The driver keeps receiving until every task has reported.
                    _ = outcome_tx.send((index, outcome));
                });

                handle
            })
            .collect();

        // Completions stop arriving once every task has dropped its sender.
        drop(outcome_tx);

        debug!(
            tasks = handles.len(),
            processes = pool.worker_count(),
            %shape,
            "sweep started"
        );

        for (index, outcome) in outcome_rx {
            let handle = handles
                .get(index)
                .expect("type invariant - every task index refers to a created handle");

            let reported = match outcome {
                Outcome::Exited(result) => {
                    trace!(index, exit_code = result.exit_code(), "task completed");
                    handle.call(move |context| context.success(result))
                }
                Outcome::Failed(failure) => {
                    trace!(index, error = %failure, "task failed");
                    handle.call(move |context| context.error(failure))
                }
            };

            if let Err(payload) = reported {
                error!(
                    index,
                    panic_message = %panic_message(payload.as_ref()),
                    "lifecycle hook panicked while reporting task outcome"
                );
            }
        }

        // All tasks have reported, this only waits for the workers to exit.
        drop(pool);

        let records = handles
            .iter()
            .map(|handle| {
                handle
                    .call(|context| context.data())
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect();

        debug!(
            tasks = handles.len(),
            elapsed = ?started.elapsed(),
            "sweep finished"
        );

        records
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Runner`].
#[derive(Debug)]
#[must_use]
pub struct RunnerBuilder {
    processes: Option<NonZero<usize>>,
    poll_interval: Duration,
    scratch_root: Option<PathBuf>,
    scratch_prefix: String,
    isolate_children: bool,
}

impl RunnerBuilder {
    fn new() -> Self {
        Self {
            processes: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            scratch_root: None,
            scratch_prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
            isolate_children: true,
        }
    }

    /// Sets how many child processes may run at the same time.
    ///
    /// Default is the available parallelism of the system.
    pub fn processes(mut self, count: NonZero<usize>) -> Self {
        self.processes = Some(count);
        self
    }

    /// Sets how often a child process is checked for exit while it is being monitored.
    ///
    /// Only lifecycles that implement [`Lifecycle::monitor()`] poll. Default is
    /// [`DEFAULT_POLL_INTERVAL`].
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the directory in which scratch directories are created.
    ///
    /// The directory must exist. Default is the system temporary directory.
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Sets the prefix of the names of scratch directories.
    ///
    /// Default is [`DEFAULT_SCRATCH_PREFIX`].
    pub fn scratch_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scratch_prefix = prefix.into();
        self
    }

    /// Sets whether each child process is started in a process group of its own.
    ///
    /// Isolated children do not receive signals aimed at the foreground process group of a
    /// terminal, so pressing Ctrl+C interrupts the sweep without also killing the children
    /// it is measuring. Has no effect on platforms other than Unix. Default is `true`.
    pub fn isolate_children(mut self, isolate: bool) -> Self {
        self.isolate_children = isolate;
        self
    }

    /// Builds the runner with the configured settings.
    #[must_use]
    pub fn build(self) -> Runner {
        let processes = self
            .processes
            .unwrap_or_else(|| thread::available_parallelism().unwrap_or(nz!(1)));

        Runner {
            processes,
            invoker: Invoker {
                poll_interval: self.poll_interval,
                scratch_root: self.scratch_root,
                scratch_prefix: self.scratch_prefix,
                isolate_children: self.isolate_children,
                platform: PlatformFacade::real(),
            },
        }
    }
}

/// Runs a sweep with default settings apart from the number of concurrent processes.
///
/// Shorthand for building a [`Runner`] with [`RunnerBuilder::processes()`] and calling
/// [`Runner::run()`].
///
/// # Panics
///
/// Resumes a panic of [`Lifecycle::data()`], as described on [`Runner::run_with()`].
pub fn run<C, V>(processes: NonZero<usize>, space: &Space<V>, shape: Shape) -> Vec<Record>
where
    C: Lifecycle<V> + Default + 'static,
    V: Clone + Send + Sync + 'static,
{
    Runner::builder()
        .processes(processes)
        .build()
        .run::<C, V>(space, shape)
}
