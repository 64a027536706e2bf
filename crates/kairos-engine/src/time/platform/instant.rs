use std::time::Instant;

use crate::time::scale::NANOS_PER_SEC;
use crate::time::source::{ClockSource, SourceKind};

/// Portable adapter over `std::time::Instant`.
///
/// Counts nanoseconds since the source was created. Bound by default on
/// targets without a native adapter; supports rebasing.
#[derive(Debug, Clone)]
pub struct InstantSource {
    origin: Instant,
}

impl InstantSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for InstantSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for InstantSource {
    fn read_counter(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frequency(&self) -> u64 {
        NANOS_PER_SEC
    }

    fn supports_rebase(&self) -> bool {
        true
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Instant
    }
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn probe(_preference: crate::time::source::ClockPreference) -> Box<dyn ClockSource> {
    // No reduced-resolution fallback exists here; `Instant` is always available.
    Box::new(InstantSource::new())
}
