#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Runs an external program once per point of a parameter space and collects measurements.
//!
//! Benchmarking a command-line program usually means running it many times with different
//! combinations of arguments and recording what each run cost. This package takes a
//! [`param_space::Space`] and a [`param_space::Shape`], starts one child process per
//! generated assignment on a fixed-size pool of worker threads and hands each run to a
//! [`Lifecycle`] implementation, which builds the command line, prepares inputs, samples the
//! live process and finally reports a [`Record`].
//!
//! Each task gets:
//!
//! * a fresh instance of the lifecycle type,
//! * an exclusive scratch directory that the child starts in and that is deleted right after
//!   [`Lifecycle::post()`],
//! * captured standard output and standard error, the exit code and the processor time of
//!   the child, delivered as an [`InvokeResult`].
//!
//! A child that cannot be started does not end the sweep. The task receives an
//! [`InvokeError`] instead and still reports a record.
//!
//! # Example
//!
//! ```no_run
//! use std::ffi::OsString;
//! use std::num::NonZero;
//! use std::path::Path;
//!
//! use param_space::{Assignment, Shape, Space};
//! use process_sweep::{Field, InvokeError, InvokeResult, Lifecycle, Record};
//!
//! #[derive(Debug, Default)]
//! struct Gzip {
//!     level: String,
//!     user_time: Option<std::time::Duration>,
//! }
//!
//! impl Lifecycle<&'static str> for Gzip {
//!     fn pre(&mut self, workdir: &Path) {
//!         std::fs::write(workdir.join("input"), vec![b'x'; 1 << 20]).unwrap();
//!     }
//!
//!     fn argv(&mut self, assignment: &Assignment<&'static str>) -> Vec<OsString> {
//!         self.level = assignment.get("level").copied().unwrap_or_default().to_string();
//!         ["gzip", "-k", self.level.as_str(), "input"].map(OsString::from).into()
//!     }
//!
//!     fn success(&mut self, result: InvokeResult) {
//!         self.user_time = Some(result.user_time());
//!     }
//!
//!     fn error(&mut self, _error: InvokeError) {}
//!
//!     fn post(&mut self) {}
//!
//!     fn data(&mut self) -> Record {
//!         Record::from([
//!             ("level".to_string(), Field::from(self.level.as_str())),
//!             ("usertime".to_string(), Field::from(self.user_time)),
//!         ])
//!     }
//! }
//!
//! let space = Space::from_pairs([("level", vec!["-1", "-5", "-9"])])?;
//! let records = process_sweep::run::<Gzip, _>(NonZero::new(2).unwrap(), &space, Shape::Cube);
//!
//! for record in records {
//!     println!("{} {}", record["level"], record["usertime"]);
//! }
//! # Ok::<(), param_space::Error>(())
//! ```
//!
//! # Logging
//!
//! The package logs through [`tracing`]. It installs no subscriber.

mod error;
mod invoke;
mod invoke_result;
mod lifecycle;
mod pal;
mod pool;
mod process_times;
mod record;
mod registry;
mod runner;

use std::any::Any;

pub use error::*;
pub use invoke_result::*;
pub use lifecycle::*;
pub use process_times::*;
pub use record::*;
pub use registry::*;
pub use runner::*;

/// The message of a panic, if the payload is one of the string types `panic!` produces.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}
