use std::borrow::Cow;
use std::time::Duration;

/// What a task observed about a child process that ran to completion.
///
/// Passed to [`Lifecycle::success()`][crate::Lifecycle::success] exactly once per task whose
/// process could be started, whatever its exit code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvokeResult {
    exit_code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    user_time: Duration,
    system_time: Duration,
    wall_time: Duration,
}

impl InvokeResult {
    pub(crate) fn new(
        exit_code: i32,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        user_time: Duration,
        system_time: Duration,
        wall_time: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            user_time,
            system_time,
            wall_time,
        }
    }

    /// The exit code of the process.
    ///
    /// If the process was terminated by a signal, this is the negated signal number
    /// (e.g. `-9` for `SIGKILL`).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Whether the process exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Everything the process wrote to standard output.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Everything the process wrote to standard error.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Standard output decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Standard error decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Processor time the process spent in user mode.
    ///
    /// Taken from the resource usage reported when the process was reaped. Zero on platforms
    /// that do not report resource usage of child processes.
    #[must_use]
    pub fn user_time(&self) -> Duration {
        self.user_time
    }

    /// Processor time the process spent in kernel mode.
    ///
    /// Zero on platforms that do not report resource usage of child processes.
    #[must_use]
    pub fn system_time(&self) -> Duration {
        self.system_time
    }

    /// Elapsed real time between starting the process and observing its exit.
    #[must_use]
    pub fn wall_time(&self) -> Duration {
        self.wall_time
    }

    /// Splits the result into the captured standard output and standard error.
    #[must_use]
    pub fn into_output(self) -> (Vec<u8>, Vec<u8>) {
        (self.stdout, self.stderr)
    }
}
