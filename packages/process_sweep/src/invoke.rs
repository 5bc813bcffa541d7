//! Runs the child process of one task and drives the lifecycle hooks around it.

use std::any::Any;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use param_space::Assignment;
use tempfile::TempDir;
use tracing::{trace, warn};

use crate::pal::{Platform, PlatformFacade, Reaped};
use crate::{ContextHandle, InvokeError, InvokeResult, Lifecycle, panic_message};

/// How a task ended, as reported by the worker to the driver.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The child ran and exited. The driver passes this to `success()`.
    Exited(InvokeResult),

    /// The child could not be run or a hook panicked. The driver passes this to `error()`.
    Failed(InvokeError),
}

/// Settings shared by every task of a sweep.
#[derive(Clone, Debug)]
pub(crate) struct Invoker {
    pub(crate) poll_interval: Duration,
    pub(crate) scratch_root: Option<PathBuf>,
    pub(crate) scratch_prefix: String,
    pub(crate) isolate_children: bool,
    pub(crate) platform: PlatformFacade,
}

impl Invoker {
    /// Runs one task up to and including deletion of its scratch directory.
    ///
    /// Calls `pre()`, `argv()`, `monitor()` and `post()` through the handle. Reporting the
    /// outcome to `success()` or `error()` is left to the caller. A panic in `pre()`,
    /// `argv()` or `post()` ends the task with [`InvokeError::Hook`].
    pub(crate) fn invoke<C, V>(
        &self,
        handle: &ContextHandle<C>,
        assignment: Assignment<V>,
    ) -> Outcome
    where
        C: Lifecycle<V> + 'static,
        V: Send + 'static,
    {
        match self.try_invoke(handle, assignment) {
            Ok(result) => Outcome::Exited(result),
            Err(error) => Outcome::Failed(error),
        }
    }

    fn try_invoke<C, V>(
        &self,
        handle: &ContextHandle<C>,
        assignment: Assignment<V>,
    ) -> Result<InvokeResult, InvokeError>
    where
        C: Lifecycle<V> + 'static,
        V: Send + 'static,
    {
        // Every early return below drops the directory, which deletes it.
        let scratch = self
            .create_scratch()
            .map_err(|source| InvokeError::Scratch { source })?;
        let workdir = scratch.path().to_path_buf();

        let pre_workdir = workdir.clone();
        handle
            .call(move |context| context.pre(&pre_workdir))
            .map_err(hook_panicked("pre"))?;

        let argv = handle
            .call(move |context| context.argv(&assignment))
            .map_err(hook_panicked("argv"))?;
        let (program, args) = argv.split_first().ok_or(InvokeError::EmptyCommand)?;
        let program_name = program.to_string_lossy().into_owned();

        let mut command = self.command(program, args);
        command.current_dir(&workdir);

        let started = Instant::now();
        let mut child = command.spawn().map_err(|source| InvokeError::Spawn {
            program: program_name.clone(),
            source,
        })?;
        let pid = child.id();
        trace!(pid, program = %program_name, "child process started");

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (reaped, stdout, stderr) = thread::scope(|scope| {
            let stdout = scope.spawn(move || drain(stdout));
            let stderr = scope.spawn(move || drain(stderr));

            let reaped = self.wait_for_exit::<C, V>(handle, &mut child);

            if reaped.is_err() {
                // The pipes only close once the child is gone, so the drains cannot finish
                // while it lives.
                _ = child.kill();
                _ = child.wait();
            }

            (
                reaped,
                stdout.join().unwrap_or_default(),
                stderr.join().unwrap_or_default(),
            )
        });

        let wall_time = started.elapsed();
        let reaped = reaped.map_err(|source| InvokeError::Wait {
            program: program_name,
            pid,
            source,
        })?;
        trace!(pid, exit_code = reaped.exit_code, "child process exited");

        handle
            .call(|context| context.post())
            .map_err(hook_panicked("post"))?;

        if let Err(error) = scratch.close() {
            warn!(
                path = %workdir.display(),
                %error,
                "failed to delete scratch directory"
            );
        }

        Ok(InvokeResult::new(
            reaped.exit_code,
            stdout,
            stderr,
            reaped.user_time,
            reaped.system_time,
            wall_time,
        ))
    }

    fn create_scratch(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.scratch_prefix);

        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    fn command(&self, program: &OsString, args: &[OsString]) -> Command {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        if self.isolate_children {
            use std::os::unix::process::CommandExt;

            // A process group of its own keeps terminal signals aimed at the sweep away from
            // the child.
            command.process_group(0);
        }

        command
    }

    /// Waits for the child to exit, sampling it through `monitor()` if the lifecycle wants
    /// that.
    #[cfg_attr(test, mutants::skip)] // Mutating the polling loop mostly just causes hangs.
    fn wait_for_exit<C, V>(
        &self,
        handle: &ContextHandle<C>,
        child: &mut Child,
    ) -> io::Result<Reaped>
    where
        C: Lifecycle<V> + 'static,
    {
        if !<C as Lifecycle<V>>::MONITORS {
            return self.platform.wait(child);
        }

        let pid = child.id();

        loop {
            if let Some(reaped) = self.platform.try_wait(child)? {
                return Ok(reaped);
            }

            match handle.call(move |context| context.monitor(pid)) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => warn!(pid, %error, "monitor hook failed"),
                Err(payload) => warn!(
                    pid,
                    panic_message = %panic_message(payload.as_ref()),
                    "monitor hook panicked"
                ),
            }

            thread::sleep(self.poll_interval);
        }
    }
}

fn hook_panicked(hook: &'static str) -> impl FnOnce(Box<dyn Any + Send>) -> InvokeError {
    move |payload| {
        let message = panic_message(payload.as_ref()).to_string();
        warn!(hook, panic_message = %message, "lifecycle hook panicked, abandoning task");

        InvokeError::Hook { hook, message }
    }
}

fn drain(stream: Option<impl Read>) -> Vec<u8> {
    let mut buffer = Vec::new();

    if let Some(mut stream) = stream {
        if let Err(error) = stream.read_to_end(&mut buffer) {
            warn!(%error, "failed to read output of child process");
        }
    }

    buffer
}
