#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in Process Sweep packages.

use std::ffi::OsString;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// A program name that does not resolve to any executable.
pub const MISSING_PROGRAM: &str = "process-sweep-missing-program-5e1f0c7a";

/// Runs a test with a timeout to prevent infinite hangs.
///
/// This function wraps a test closure with a timeout mechanism. If the test
/// takes longer than the timeout to complete, the test fails instead of
/// hanging the CI/build system.
///
/// The timeout is 30 seconds under normal conditions, which leaves room for tests
/// that start child processes on a loaded machine, and 60 seconds under Miri.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog
/// is disabled and the test function is executed directly. This allows mutation
/// testing to properly detect hanging mutations.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode).
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// with_watchdog(|| {
///     // Your test code here
///     assert_eq!(2 + 2, 4);
/// });
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    // Check if we are running under mutation testing.
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        // Under mutation testing, disable the watchdog to allow hanging mutations.
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    // Run the test in a separate thread
    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // Send the result back - if this fails, the receiver has timed out
        drop(tx.send(result));
    });

    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(30)
    };

    // Wait for either the test to complete or timeout.
    match rx.recv_timeout(timeout) {
        Ok(result) => {
            // Test completed successfully, join the thread to clean up
            test_handle.join().expect("Test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("Test exceeded {timeout:?} timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            // Thread panicked, join it to get the panic
            match test_handle.join() {
                Ok(()) => panic!("Test thread disconnected unexpectedly"),
                Err(e) => std::panic::resume_unwind(e),
            }
        }
    }
}

/// Builds a command line that runs `script` with the platform shell.
///
/// Uses `sh -c` on Unix and `cmd /C` on Windows, so keep scripts to syntax both understand
/// (e.g. `echo`, `exit`, `&&` and redirections).
#[must_use]
pub fn shell(script: &str) -> Vec<OsString> {
    let (shell, flag) = if cfg!(windows) {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };

    [shell, flag, script].into_iter().map(OsString::from).collect()
}

/// Builds a command line for a child process that does nothing for `duration` and exits
/// with code 0.
///
/// The program is started directly, without an intermediate shell, so killing the child
/// also ends the wait.
#[must_use]
pub fn sleep(duration: Duration) -> Vec<OsString> {
    if cfg!(windows) {
        let millis = duration.as_millis().to_string();

        ["powershell", "-NoProfile", "-Command", "Start-Sleep", "-Milliseconds"]
            .into_iter()
            .map(OsString::from)
            .chain([OsString::from(millis)])
            .collect()
    } else {
        let seconds = format!("{:.3}", duration.as_secs_f64());

        [OsString::from("sleep"), OsString::from(seconds)].into()
    }
}
