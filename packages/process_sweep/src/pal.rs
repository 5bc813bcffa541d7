//! Platform abstraction layer for reaping child processes and reading their resource usage.
//!
//! The real implementation talks to the operating system. Tests can substitute a fake that
//! reports controlled processor times and can simulate wait failures.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

#[cfg(any(test, not(unix)))]
pub(crate) use abstractions::exit_code;
pub(crate) use abstractions::{Platform, Reaped};
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
