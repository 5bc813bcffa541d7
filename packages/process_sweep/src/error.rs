use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Reasons why a task could not produce a result for its child process.
///
/// Delivered to [`Lifecycle::error()`][crate::Lifecycle::error] in place of a result. None of
/// these end the sweep: other tasks keep running and the failed task still contributes a
/// record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// The scratch directory for the task could not be created.
    #[error("failed to create scratch directory: {source}")]
    Scratch {
        /// The underlying I/O error.
        source: io::Error,
    },

    /// [`Lifecycle::argv()`][crate::Lifecycle::argv] returned an empty command line.
    #[error("the command line is empty, it must at least name the program to run")]
    EmptyCommand,

    /// The operating system refused to start the program, for example because it does not
    /// exist or is not executable.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The program named by the first command line argument.
        program: String,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The child process was started but its exit could not be observed. The child is killed
    /// when this happens.
    #[error("failed to wait for '{program}' (pid {pid}): {source}")]
    Wait {
        /// The program named by the first command line argument.
        program: String,

        /// Process ID of the child.
        pid: u32,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// A lifecycle hook of the task panicked before a result could be reported. The
    /// remaining hooks of the task other than `error()` and `data()` are skipped.
    #[error("lifecycle hook '{hook}()' panicked: {message}")]
    Hook {
        /// Name of the hook that panicked, such as `argv`.
        hook: &'static str,

        /// Message of the panic, if it had a string payload.
        message: String,
    },
}

impl InvokeError {
    /// The underlying I/O error, if the failure came from the operating system.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Scratch { source } | Self::Spawn { source, .. } | Self::Wait { source, .. } => {
                Some(source)
            }
            Self::EmptyCommand | Self::Hook { .. } => None,
        }
    }
}

/// Error type returned by [`Lifecycle::monitor()`][crate::Lifecycle::monitor].
///
/// Monitoring is best-effort. Errors are logged and otherwise ignored.
pub type MonitorError = Box<dyn StdError + Send + Sync>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(InvokeError: Send, Sync, Debug);

    #[test]
    fn spawn_error_names_program() {
        let error = InvokeError::Spawn {
            program: "unknown_binary.exe".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };

        assert!(error.to_string().contains("unknown_binary.exe"));
        assert_eq!(
            error.io_error().map(io::Error::kind),
            Some(io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn empty_command_has_no_io_error() {
        assert!(InvokeError::EmptyCommand.io_error().is_none());
    }

    #[test]
    fn hook_panic_names_hook_and_message() {
        let error = InvokeError::Hook {
            hook: "argv",
            message: "no such preset".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "lifecycle hook 'argv()' panicked: no such preset"
        );
        assert!(error.io_error().is_none());
    }
}
