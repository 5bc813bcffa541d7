use std::io;
use std::process::{Child, ExitStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ProcessTimes;
use crate::pal::abstractions::{Platform, Reaped};
use crate::pal::exit_code;

#[derive(Debug, Default)]
struct FakePlatformState {
    reaped_user_time: Duration,
    reaped_system_time: Duration,
    process_times: ProcessTimes,
    wait_error: Option<io::ErrorKind>,
}

/// Waits for real child processes but reports processor times chosen by the test.
///
/// Clones share their state, so a test can keep one clone and hand another to the code under
/// test.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakePlatform {
    state: Arc<Mutex<FakePlatformState>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the processor times reported when a child is reaped.
    pub(crate) fn set_reaped_times(&self, user: Duration, system: Duration) {
        let mut state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        state.reaped_user_time = user;
        state.reaped_system_time = system;
    }

    /// Sets the processor times reported for live processes.
    pub(crate) fn set_process_times(&self, times: ProcessTimes) {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .process_times = times;
    }

    /// Makes every subsequent wait fail with an error of the given kind.
    pub(crate) fn fail_waits(&self, kind: io::ErrorKind) {
        self.state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .wait_error = Some(kind);
    }

    fn reaped(&self, status: ExitStatus) -> Reaped {
        let state = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned");

        Reaped {
            exit_code: exit_code(status),
            user_time: state.reaped_user_time,
            system_time: state.reaped_system_time,
        }
    }

    fn check_wait_error(&self) -> io::Result<()> {
        let wait_error = self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .wait_error;

        wait_error.map_or(Ok(()), |kind| Err(io::Error::from(kind)))
    }
}

impl Platform for FakePlatform {
    fn try_wait(&self, child: &mut Child) -> io::Result<Option<Reaped>> {
        self.check_wait_error()?;
        Ok(child.try_wait()?.map(|status| self.reaped(status)))
    }

    fn wait(&self, child: &mut Child) -> io::Result<Reaped> {
        self.check_wait_error()?;
        let status = child.wait()?;
        Ok(self.reaped(status))
    }

    fn process_times(&self, _pid: u32) -> io::Result<ProcessTimes> {
        Ok(self
            .state
            .lock()
            .expect("FakePlatform state lock should not be poisoned")
            .process_times)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_times() {
        let platform = FakePlatform::new();

        assert_eq!(platform.process_times(1).unwrap(), ProcessTimes::default());
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        let times = ProcessTimes::new(Duration::from_millis(100), Duration::ZERO);
        platform1.set_process_times(times);

        assert_eq!(platform2.process_times(1).unwrap(), times);
    }

    #[test]
    fn simulated_wait_failure() {
        let platform = FakePlatform::new();
        platform.fail_waits(io::ErrorKind::PermissionDenied);

        let error = platform.check_wait_error().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
    }
}
