use std::io;
use std::time::Duration;

use crate::pal::{Platform, PlatformFacade};

/// Processor time consumed by a process, split by mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ProcessTimes {
    user: Duration,
    system: Duration,
}

impl ProcessTimes {
    /// Creates a value from user mode and kernel mode processor time.
    #[must_use]
    pub const fn new(user: Duration, system: Duration) -> Self {
        Self { user, system }
    }

    /// Processor time spent in user mode.
    #[must_use]
    pub const fn user(&self) -> Duration {
        self.user
    }

    /// Processor time spent in kernel mode.
    #[must_use]
    pub const fn system(&self) -> Duration {
        self.system
    }

    /// Processor time spent in either mode.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.user.saturating_add(self.system)
    }
}

/// Reads the processor time consumed so far by the live process `pid`.
///
/// Intended for sampling a child from [`Lifecycle::monitor()`][crate::Lifecycle::monitor].
/// The final totals of a child are reported in its [`InvokeResult`][crate::InvokeResult]
/// and need no sampling.
///
/// # Errors
///
/// Returns an error if the process does not exist, or with [`io::ErrorKind::Unsupported`] on
/// platforms other than Linux.
///
/// # Example
///
/// ```no_run
/// let times = process_sweep::process_times(std::process::id())?;
/// println!("{:?} in user mode", times.user());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn process_times(pid: u32) -> io::Result<ProcessTimes> {
    PlatformFacade::real().process_times(pid)
}
