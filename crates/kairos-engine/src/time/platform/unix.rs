//! Unix clock adapters.
//!
//! Preferred: `CLOCK_MONOTONIC`, already in nanoseconds.
//! Fallback: `gettimeofday`, microsecond resolution. The fallback follows the
//! system wall clock, so it can step backwards when the time is adjusted.
//!
//! Both adapters support rebasing through `Timeline::set`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::time::scale::NANOS_PER_SEC;
use crate::time::source::{ClockPreference, ClockSource, SourceKind};

const MICROS_PER_SEC: u64 = 1_000_000;

fn monotonic_nanos() -> Option<u64> {
    // SAFETY: `timespec` is plain old data; all-zero is a valid value on every
    // target, including those with private padding fields.
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts) };
    if rc != 0 {
        return None;
    }

    Some((ts.tv_sec as u64).wrapping_mul(NANOS_PER_SEC).wrapping_add(ts.tv_nsec as u64))
}

fn wall_clock_micros() -> u64 {
    // SAFETY: as for `timespec` above.
    let mut tv: libc::timeval = unsafe { std::mem::zeroed() };
    // SAFETY: `tv` is valid and writable; a null timezone pointer is permitted.
    unsafe {
        libc::gettimeofday(&mut tv, std::ptr::null_mut());
    }

    (tv.tv_sec as u64).wrapping_mul(MICROS_PER_SEC).wrapping_add(tv.tv_usec as u64)
}

/// Returns `reading` and remembers it, or the last remembered value when the
/// read failed.
fn or_last(reading: Option<u64>, last: &AtomicU64) -> u64 {
    match reading {
        Some(now) => {
            last.store(now, Ordering::Relaxed);
            now
        }
        None => last.load(Ordering::Relaxed),
    }
}

/// `CLOCK_MONOTONIC` through `clock_gettime`.
#[derive(Debug)]
pub struct MonotonicSource {
    last: AtomicU64,
}

impl MonotonicSource {
    /// Returns `None` when the kernel rejects `CLOCK_MONOTONIC`.
    pub fn probe() -> Option<Self> {
        monotonic_nanos().map(|now| Self {
            last: AtomicU64::new(now),
        })
    }
}

impl ClockSource for MonotonicSource {
    fn read_counter(&self) -> u64 {
        // A failed read repeats the previous value so `now()` stalls rather
        // than jumping to a wrapped difference.
        or_last(monotonic_nanos(), &self.last)
    }

    fn frequency(&self) -> u64 {
        NANOS_PER_SEC
    }

    fn supports_rebase(&self) -> bool {
        true
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Monotonic
    }
}

/// `gettimeofday` in microseconds.
#[derive(Debug, Default)]
pub struct WallClockSource;

impl ClockSource for WallClockSource {
    fn read_counter(&self) -> u64 {
        wall_clock_micros()
    }

    fn frequency(&self) -> u64 {
        MICROS_PER_SEC
    }

    fn supports_rebase(&self) -> bool {
        true
    }

    fn kind(&self) -> SourceKind {
        SourceKind::WallClock
    }
}

pub(crate) fn probe(preference: ClockPreference) -> Box<dyn ClockSource> {
    if preference == ClockPreference::Auto {
        if let Some(source) = MonotonicSource::probe() {
            return Box::new(source);
        }
        log::debug!("CLOCK_MONOTONIC unavailable; falling back to gettimeofday");
    }

    Box::new(WallClockSource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_is_available_and_non_decreasing() {
        let source = MonotonicSource::probe().expect("CLOCK_MONOTONIC");
        let a = source.read_counter();
        let b = source.read_counter();
        assert!(b >= a);
    }

    #[test]
    fn failed_read_repeats_last_good_value() {
        let last = AtomicU64::new(0);

        assert_eq!(or_last(Some(5_000), &last), 5_000);
        assert_eq!(or_last(None, &last), 5_000);
        assert_eq!(or_last(Some(7_000), &last), 7_000);
        assert_eq!(or_last(None, &last), 7_000);
    }

    #[test]
    fn first_reading_seeds_fallback_value() {
        let source = MonotonicSource::probe().expect("CLOCK_MONOTONIC");
        let seeded = source.last.load(Ordering::Relaxed);
        assert!(seeded > 0);
        assert!(source.read_counter() >= seeded);
    }

    #[test]
    fn auto_prefers_monotonic() {
        assert_eq!(probe(ClockPreference::Auto).kind(), SourceKind::Monotonic);
    }

    #[test]
    fn forced_fallback_binds_wall_clock() {
        let source = probe(ClockPreference::Fallback);
        assert_eq!(source.kind(), SourceKind::WallClock);
        assert_eq!(source.frequency(), MICROS_PER_SEC);
        assert!(source.read_counter() > 0);
    }
}
