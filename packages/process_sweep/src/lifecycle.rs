use std::ffi::OsString;
use std::path::Path;

use param_space::Assignment;

use crate::{InvokeError, InvokeResult, MonitorError, Record};

/// The hooks that govern one task of a sweep: preparing inputs, building the command line,
/// observing the child process and reporting measurements.
///
/// Implement this once per benchmarking scenario. The runner creates a fresh instance for
/// every generated assignment, so all state of one task lives in one instance and nothing is
/// shared between tasks.
///
/// # Call order
///
/// For every task the hooks are called strictly in this order:
///
/// 1. [`pre()`](Self::pre) with the task's empty scratch directory.
/// 2. [`argv()`](Self::argv) with the task's assignment.
/// 3. [`monitor()`](Self::monitor) zero or more times while the child runs, if
///    [`MONITORS`](Self::MONITORS) is `true`.
/// 4. [`post()`](Self::post) after the child exited, while the scratch directory still
///    exists. The directory is deleted as soon as this returns.
/// 5. [`success()`](Self::success) with the captured result.
/// 6. [`data()`](Self::data), once every task of the sweep has completed.
///
/// If the child process cannot be started or its exit cannot be observed,
/// [`error()`](Self::error) is called in place of steps 4 and 5. A scratch directory that could
/// not be created skips every hook but `error()` and `data()`.
///
/// # Panics
///
/// A panic in `pre()`, `argv()` or `post()` skips the remaining steps of the task and
/// [`error()`](Self::error) receives [`InvokeError::Hook`] instead. Panics in `success()` and
/// `error()` are logged and the task still contributes its record. Panics and errors in
/// `monitor()` are logged and ignored. A panic in `data()` is resumed on the thread that
/// runs the sweep.
///
/// # Example
///
/// ```no_run
/// use std::ffi::OsString;
/// use std::path::Path;
///
/// use param_space::{Assignment, Shape, Space};
/// use process_sweep::{Field, InvokeError, InvokeResult, Lifecycle, Record, Runner};
///
/// #[derive(Debug, Default)]
/// struct Echo {
///     stdout: String,
/// }
///
/// impl Lifecycle<&'static str> for Echo {
///     fn pre(&mut self, _workdir: &Path) {}
///
///     fn argv(&mut self, assignment: &Assignment<&'static str>) -> Vec<OsString> {
///         let words = assignment.values().copied();
///         ["echo"].into_iter().chain(words).map(OsString::from).collect()
///     }
///
///     fn success(&mut self, result: InvokeResult) {
///         self.stdout = result.stdout_lossy().trim().to_string();
///     }
///
///     fn error(&mut self, error: InvokeError) {
///         self.stdout = error.to_string();
///     }
///
///     fn post(&mut self) {}
///
///     fn data(&mut self) -> Record {
///         Record::from([("stdout".to_string(), Field::from(self.stdout.as_str()))])
///     }
/// }
///
/// let space = Space::from_pairs([("greeting", vec!["hello", "goodbye"])])?;
/// let records = Runner::new().run::<Echo, _>(&space, Shape::Cube);
///
/// assert_eq!(records.len(), 2);
/// # Ok::<(), param_space::Error>(())
/// ```
pub trait Lifecycle<V> {
    /// Whether the type implements [`monitor()`](Self::monitor).
    ///
    /// When `false`, the runner waits for the child with a single blocking wait instead of
    /// polling it.
    const MONITORS: bool = false;

    /// Called right before the child process is started, with the directory it will start
    /// in. The directory is empty and exclusive to this task.
    ///
    /// Use it to stage input files and record anything needed before the run.
    fn pre(&mut self, workdir: &Path);

    /// Builds the complete command line for the task, program first.
    ///
    /// The program is resolved the same way as [`std::process::Command::new()`] resolves it.
    fn argv(&mut self, assignment: &Assignment<V>) -> Vec<OsString>;

    /// Called repeatedly, about once per poll interval, while the child process is alive.
    ///
    /// Use it to sample the child, for example with
    /// [`process_times()`][crate::process_times]. It may never be called if the process
    /// exits before the first sample is due.
    ///
    /// Only called if [`MONITORS`](Self::MONITORS) is `true`.
    ///
    /// # Errors
    ///
    /// Returned errors are logged and otherwise ignored.
    fn monitor(&mut self, pid: u32) -> Result<(), MonitorError> {
        _ = pid;
        Ok(())
    }

    /// Called once the child exited and its output was captured.
    ///
    /// Called for every started process, whatever its exit code.
    fn success(&mut self, result: InvokeResult);

    /// Called instead of [`success()`](Self::success) when the child process could not be
    /// run. [`post()`](Self::post) is not called for such a task.
    fn error(&mut self, error: InvokeError);

    /// Called right after the child exited. The scratch directory still exists and is
    /// deleted as soon as this returns.
    fn post(&mut self);

    /// Reports the measurements of the task. Called exactly once, after every task of the
    /// sweep has completed.
    fn data(&mut self) -> Record;
}
