use std::io;
use std::process::Child;

use crate::ProcessTimes;
use crate::pal::abstractions::{Platform, Reaped};
#[cfg(test)]
use crate::pal::fake::FakePlatform;
use crate::pal::real::RealPlatform;

/// Switches between the real platform and, in tests, a fake one.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    Real(RealPlatform),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(RealPlatform)
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }
}

impl Platform for PlatformFacade {
    fn try_wait(&self, child: &mut Child) -> io::Result<Option<Reaped>> {
        match self {
            Self::Real(platform) => platform.try_wait(child),
            #[cfg(test)]
            Self::Fake(platform) => platform.try_wait(child),
        }
    }

    fn wait(&self, child: &mut Child) -> io::Result<Reaped> {
        match self {
            Self::Real(platform) => platform.wait(child),
            #[cfg(test)]
            Self::Fake(platform) => platform.wait(child),
        }
    }

    fn process_times(&self, pid: u32) -> io::Result<ProcessTimes> {
        match self {
            Self::Real(platform) => platform.process_times(pid),
            #[cfg(test)]
            Self::Fake(platform) => platform.process_times(pid),
        }
    }
}
