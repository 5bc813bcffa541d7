use std::io;
use std::process::Child;

use crate::ProcessTimes;
use crate::pal::abstractions::{Platform, Reaped};

/// Reaps children with `wait4()` on Unix, which reports the resource usage of the reaped
/// process together with its exit status. Elsewhere, falls back to the standard library and
/// reports zero processor time.
#[derive(Clone, Debug)]
pub(crate) struct RealPlatform;

#[cfg(unix)]
impl Platform for RealPlatform {
    fn try_wait(&self, child: &mut Child) -> io::Result<Option<Reaped>> {
        unix::reap(child.id(), libc::WNOHANG)
    }

    fn wait(&self, child: &mut Child) -> io::Result<Reaped> {
        unix::reap(child.id(), 0)?
            .ok_or_else(|| io::Error::other("blocking wait returned without reaping the child"))
    }

    fn process_times(&self, pid: u32) -> io::Result<ProcessTimes> {
        unix::process_times(pid)
    }
}

#[cfg(not(unix))]
impl Platform for RealPlatform {
    fn try_wait(&self, child: &mut Child) -> io::Result<Option<Reaped>> {
        Ok(child.try_wait()?.map(reaped_without_usage))
    }

    fn wait(&self, child: &mut Child) -> io::Result<Reaped> {
        child.wait().map(reaped_without_usage)
    }

    fn process_times(&self, _pid: u32) -> io::Result<ProcessTimes> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "reading processor times of other processes is not supported on this platform",
        ))
    }
}

#[cfg(not(unix))]
fn reaped_without_usage(status: std::process::ExitStatus) -> Reaped {
    Reaped {
        exit_code: crate::pal::exit_code(status),
        user_time: std::time::Duration::ZERO,
        system_time: std::time::Duration::ZERO,
    }
}

#[cfg(unix)]
mod unix {
    use std::io;
    use std::mem;
    use std::time::Duration;

    use crate::ProcessTimes;
    use crate::pal::abstractions::Reaped;

    /// Reaps the process with `wait4()`, retrying if interrupted by a signal.
    ///
    /// Returns `None` only if `options` contains `WNOHANG` and the process is still running.
    pub(super) fn reap(pid: u32, options: libc::c_int) -> io::Result<Option<Reaped>> {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

        let mut status: libc::c_int = 0;

        // SAFETY: `rusage` consists of plain integers, for which all zeroes is a valid value.
        let mut usage: libc::rusage = unsafe { mem::zeroed() };

        loop {
            // SAFETY: Both pointers are valid for writes for the duration of the call.
            let result = unsafe { libc::wait4(pid, &raw mut status, options, &raw mut usage) };

            if result == pid {
                break;
            }

            if result == 0 {
                return Ok(None);
            }

            let error = io::Error::last_os_error();
            if error.kind() != io::ErrorKind::Interrupted {
                return Err(error);
            }
        }

        Ok(Some(Reaped {
            exit_code: decode_status(status),
            user_time: timeval_to_duration(usage.ru_utime),
            system_time: timeval_to_duration(usage.ru_stime),
        }))
    }

    fn decode_status(status: libc::c_int) -> i32 {
        if libc::WIFEXITED(status) {
            libc::WEXITSTATUS(status)
        } else if libc::WIFSIGNALED(status) {
            libc::WTERMSIG(status).saturating_neg()
        } else {
            -1
        }
    }

    fn timeval_to_duration(value: libc::timeval) -> Duration {
        let seconds = u64::try_from(value.tv_sec).unwrap_or_default();
        let micros = u64::try_from(value.tv_usec).unwrap_or_default();

        Duration::from_secs(seconds).saturating_add(Duration::from_micros(micros))
    }

    #[cfg(target_os = "linux")]
    pub(super) fn process_times(pid: u32) -> io::Result<ProcessTimes> {
        let stat = std::fs::read_to_string(format!("/proc/{pid}/stat"))?;

        // SAFETY: No preconditions, only reads a configuration value.
        let ticks_per_second = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        let ticks_per_second = u64::try_from(ticks_per_second)
            .ok()
            .filter(|ticks| *ticks > 0)
            .ok_or_else(|| io::Error::other("clock tick rate is not available"))?;

        parse_stat(&stat, ticks_per_second)
    }

    #[cfg(not(target_os = "linux"))]
    pub(super) fn process_times(_pid: u32) -> io::Result<ProcessTimes> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "reading processor times of other processes is not supported on this platform",
        ))
    }

    /// Extracts `utime` and `stime` from the contents of `/proc/<pid>/stat`.
    #[cfg(target_os = "linux")]
    fn parse_stat(stat: &str, ticks_per_second: u64) -> io::Result<ProcessTimes> {
        // The command name is in parentheses and may itself contain spaces and parentheses,
        // so the fixed fields are located from the last closing parenthesis.
        let after_name = stat
            .rfind(')')
            .and_then(|index| stat.get(index.checked_add(1)?..))
            .ok_or_else(|| malformed(stat))?;

        // Fields after the name start at field 3 (state); utime and stime are fields 14 and 15.
        let mut fields = after_name.split_whitespace().skip(11);

        let mut next_ticks = || -> io::Result<u64> {
            fields
                .next()
                .and_then(|field| field.parse().ok())
                .ok_or_else(|| malformed(stat))
        };

        let user = next_ticks()?;
        let system = next_ticks()?;

        Ok(ProcessTimes::new(
            ticks_to_duration(user, ticks_per_second),
            ticks_to_duration(system, ticks_per_second),
        ))
    }

    #[cfg(target_os = "linux")]
    fn ticks_to_duration(ticks: u64, ticks_per_second: u64) -> Duration {
        let nanos = u128::from(ticks)
            .saturating_mul(1_000_000_000)
            .checked_div(u128::from(ticks_per_second))
            .unwrap_or_default();

        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    #[cfg(target_os = "linux")]
    fn malformed(stat: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unexpected format of process stat: {stat}"),
        )
    }

}
