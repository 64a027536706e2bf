//! Windows clock adapters.
//!
//! Preferred: `QueryPerformanceCounter` at the frequency reported by
//! `QueryPerformanceFrequency`. Fallback: `GetTickCount64`, fixed at 1000 Hz.
//!
//! Neither adapter supports rebasing; `Timeline::set` is a no-op on Windows.

use windows_sys::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};
use windows_sys::Win32::System::SystemInformation::GetTickCount64;

use crate::time::source::{ClockPreference, ClockSource, SourceKind};

const TICK_COUNT_FREQUENCY: u64 = 1_000;

/// `QueryPerformanceCounter`.
#[derive(Debug)]
pub struct PerformanceCounterSource {
    frequency: u64,
}

impl PerformanceCounterSource {
    /// Returns `None` when the performance counter is unavailable.
    pub fn probe() -> Option<Self> {
        let mut frequency: i64 = 0;
        // SAFETY: `frequency` is a valid, writable i64 for the duration of the call.
        let ok = unsafe { QueryPerformanceFrequency(&mut frequency) };
        if ok == 0 || frequency <= 0 {
            return None;
        }

        Some(Self { frequency: frequency as u64 })
    }
}

impl ClockSource for PerformanceCounterSource {
    fn read_counter(&self) -> u64 {
        let mut counter: i64 = 0;
        // SAFETY: `counter` is a valid, writable i64 for the duration of the call.
        unsafe {
            QueryPerformanceCounter(&mut counter);
        }
        counter as u64
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }

    fn supports_rebase(&self) -> bool {
        false
    }

    fn kind(&self) -> SourceKind {
        SourceKind::PerformanceCounter
    }
}

/// `GetTickCount64` in milliseconds.
#[derive(Debug, Default)]
pub struct TickCountSource;

impl ClockSource for TickCountSource {
    fn read_counter(&self) -> u64 {
        // SAFETY: no arguments, no preconditions.
        unsafe { GetTickCount64() }
    }

    fn frequency(&self) -> u64 {
        TICK_COUNT_FREQUENCY
    }

    fn supports_rebase(&self) -> bool {
        false
    }

    fn kind(&self) -> SourceKind {
        SourceKind::TickCount
    }
}

pub(crate) fn probe(preference: ClockPreference) -> Box<dyn ClockSource> {
    if preference == ClockPreference::Auto {
        if let Some(source) = PerformanceCounterSource::probe() {
            return Box::new(source);
        }
        log::debug!("QueryPerformanceCounter unavailable; falling back to GetTickCount64");
    }

    Box::new(TickCountSource)
}
