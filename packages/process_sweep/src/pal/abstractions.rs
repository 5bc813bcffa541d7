use std::fmt::Debug;
use std::io;
use std::process::Child;
#[cfg(any(test, not(unix)))]
use std::process::ExitStatus;
use std::time::Duration;

use crate::ProcessTimes;

/// Exit information of a child process that has been reaped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Reaped {
    pub(crate) exit_code: i32,
    pub(crate) user_time: Duration,
    pub(crate) system_time: Duration,
}

/// Operating system services used to run and observe child processes.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reaps the child if it has exited, without blocking.
    ///
    /// Returns `None` if the child is still running.
    fn try_wait(&self, child: &mut Child) -> io::Result<Option<Reaped>>;

    /// Blocks until the child has exited and reaps it.
    fn wait(&self, child: &mut Child) -> io::Result<Reaped>;

    /// Reads the processor time consumed so far by a live process.
    fn process_times(&self, pid: u32) -> io::Result<ProcessTimes>;
}

/// Exit code of a finished process, with termination by signal `n` reported as `-n`.
#[cfg(any(test, not(unix)))]
pub(crate) fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return signal.saturating_neg();
        }
    }

    -1
}
