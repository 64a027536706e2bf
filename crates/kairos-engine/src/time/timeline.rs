use std::sync::atomic::{AtomicU64, Ordering};

use crate::event::Stamped;

use super::platform;
use super::scale::{nanos_to_ticks, ticks_to_nanos};
use super::source::{ClockPreference, ClockSource, SourceKind, TimelineConfig};

/// Raw counter base and frequency captured when a timeline is bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClockBase {
    /// Counter value corresponding to logical time zero.
    pub base: u64,
    /// Counter ticks per second. Always non-zero.
    pub frequency: u64,
}

/// Monotonic nanosecond timeline over a platform counter.
///
/// A `Timeline` is a context object: create one near the top of the program
/// with [`Timeline::initialize`] and pass it by reference (or in an `Arc`) to
/// whatever needs elapsed time. Nothing is process-global, so tests can run
/// any number of independent timelines.
///
/// Logical time is `(counter - base)` scaled to nanoseconds. It starts at zero
/// when the timeline is bound and is non-decreasing between calls to
/// [`now`](Self::now) unless [`set`](Self::set) moves the origin.
///
/// # Rebasing
///
/// Whether `set` does anything depends on the bound adapter:
///
/// | Adapter | `set` |
/// |---------|-------|
/// | unix `CLOCK_MONOTONIC` / `gettimeofday` | rebases |
/// | windows `QueryPerformanceCounter` / `GetTickCount64` | no-op |
/// | `Instant` | rebases |
/// | [`ManualSource`](super::ManualSource) | configurable |
///
/// Check [`supports_rebase`](Self::supports_rebase) when the difference matters.
///
/// # Concurrency
///
/// `now` never blocks. `set` racing with `now` on other threads is memory-safe,
/// but readers may observe either origin; serialize them if that matters.
#[derive(Debug)]
pub struct Timeline {
    source: Box<dyn ClockSource>,
    frequency: u64,
    base: AtomicU64,
}

impl Timeline {
    /// Probes the platform's high-resolution counter and binds it, falling
    /// back to the reduced-resolution counter when it is unavailable.
    ///
    /// Falling back is not an error; see [`is_degraded`](Self::is_degraded).
    pub fn initialize() -> Self {
        Self::from_config(TimelineConfig::default())
    }

    pub fn from_config(config: TimelineConfig) -> Self {
        let source = platform::probe(config.preference);
        if config.preference == ClockPreference::Fallback {
            log::debug!("timeline: high-resolution probe skipped by configuration");
        }
        Self::bind(source)
    }

    /// Binds an explicit clock source.
    pub fn with_source<S>(source: S) -> Self
    where
        S: ClockSource + 'static,
    {
        Self::bind(Box::new(source))
    }

    fn bind(source: Box<dyn ClockSource>) -> Self {
        let frequency = source.frequency();
        debug_assert!(frequency > 0, "clock source reported a zero frequency");
        let frequency = frequency.max(1);

        let base = source.read_counter();

        log::debug!(
            "timeline bound to {} source at {} Hz{}",
            source.kind(),
            frequency,
            if source.kind().is_fallback() { " (reduced resolution)" } else { "" },
        );

        Self {
            source,
            frequency,
            base: AtomicU64::new(base),
        }
    }

    /// Nanoseconds elapsed on this timeline.
    #[inline]
    pub fn now(&self) -> u64 {
        let raw = self
            .source
            .read_counter()
            .wrapping_sub(self.base.load(Ordering::Relaxed));

        ticks_to_nanos(raw, self.frequency)
    }

    /// Moves the origin so that `now()` continues from `nanos`.
    ///
    /// The target is rounded down to a whole counter tick. On adapters without
    /// rebase support the call is accepted and ignored.
    pub fn set(&self, nanos: u64) {
        if !self.source.supports_rebase() {
            log::trace!("timeline: set({nanos}) ignored by {} source", self.source.kind());
            return;
        }

        let offset = nanos_to_ticks(nanos, self.frequency);
        let base = self.source.read_counter().wrapping_sub(offset);
        self.base.store(base, Ordering::Relaxed);
    }

    /// Wraps `payload` with the current time.
    pub fn stamp<T>(&self, payload: T) -> Stamped<T> {
        Stamped::new(self.now(), payload)
    }

    /// Counter ticks per second of the bound source.
    ///
    /// Low values (e.g. 1000 for a millisecond tick count) mean `now()` only
    /// advances in coarse steps.
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Returns `true` when a reduced-resolution fallback is bound.
    pub fn is_degraded(&self) -> bool {
        self.source.kind().is_fallback()
    }

    pub fn supports_rebase(&self) -> bool {
        self.source.supports_rebase()
    }

    pub fn clock_base(&self) -> ClockBase {
        ClockBase {
            base: self.base.load(Ordering::Relaxed),
            frequency: self.frequency,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::time::ManualSource;
    use crate::time::scale::NANOS_PER_SEC;

    // ── now ───────────────────────────────────────────────────────────────

    #[test]
    fn starts_at_zero_relative_to_bind_time() {
        let source = ManualSource::new(1_000).starting_at(123_456);
        let timeline = Timeline::with_source(source.clone());

        assert_eq!(timeline.now(), 0);
        source.advance(250);
        assert_eq!(timeline.now(), 250_000_000);
    }

    #[test]
    fn scales_fast_counters_without_overflow() {
        let source = ManualSource::new(3_000_000_000);
        let timeline = Timeline::with_source(source.clone());

        // One hour on a 3 GHz counter.
        source.advance(3_000_000_000 * 3_600);
        assert_eq!(timeline.now(), 3_600 * NANOS_PER_SEC);
    }

    #[test]
    fn counters_faster_than_max_frequency_read_exactly() {
        #[derive(Debug)]
        struct TwentyGigahertz(ManualSource);

        impl ClockSource for TwentyGigahertz {
            fn read_counter(&self) -> u64 {
                self.0.read_counter()
            }

            fn frequency(&self) -> u64 {
                20_000_000_000
            }

            fn supports_rebase(&self) -> bool {
                true
            }

            fn kind(&self) -> SourceKind {
                SourceKind::Manual
            }
        }

        let counter = ManualSource::nanos();
        let timeline = Timeline::with_source(TwentyGigahertz(counter.clone()));
        assert!(timeline.frequency() > crate::time::scale::MAX_FREQUENCY);

        counter.advance(20_000_000_000 - 1);
        assert_eq!(timeline.now(), 999_999_999);
        counter.advance(1);
        assert_eq!(timeline.now(), NANOS_PER_SEC);

        timeline.set(1_500_000_000);
        assert_eq!(timeline.now(), 1_500_000_000);
    }

    #[test]
    fn survives_counter_wrap() {
        let source = ManualSource::nanos().starting_at(u64::MAX - 10);
        let timeline = Timeline::with_source(source.clone());

        source.advance(20);
        assert_eq!(timeline.now(), 20);
    }

    #[test]
    fn platform_timeline_is_non_decreasing() {
        let timeline = Timeline::initialize();
        let mut last = timeline.now();
        for _ in 0..10_000 {
            let now = timeline.now();
            assert!(now >= last, "{now} < {last}");
            last = now;
        }
    }

    #[test]
    fn platform_timeline_advances_with_real_time() {
        let timeline = Timeline::initialize();
        let before = timeline.now();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let elapsed = timeline.now() - before;

        // Coarse fallback counters may lag by one tick.
        let tick = NANOS_PER_SEC / timeline.frequency();
        assert!(elapsed + tick >= 20_000_000, "elapsed {elapsed} ns");
    }

    #[test]
    fn shared_reads_are_non_decreasing_per_thread() {
        let timeline = Arc::new(Timeline::initialize());

        std::thread::scope(|s| {
            for _ in 0..4 {
                let timeline = Arc::clone(&timeline);
                s.spawn(move || {
                    let mut last = timeline.now();
                    for _ in 0..5_000 {
                        let now = timeline.now();
                        assert!(now >= last);
                        last = now;
                    }
                });
            }
        });
    }

    // ── set ───────────────────────────────────────────────────────────────

    #[test]
    fn set_rebases_when_supported() {
        let source = ManualSource::nanos().starting_at(5_000);
        let timeline = Timeline::with_source(source.clone());
        source.advance(700);

        timeline.set(10 * NANOS_PER_SEC);
        assert_eq!(timeline.now(), 10 * NANOS_PER_SEC);

        source.advance(42);
        assert_eq!(timeline.now(), 10 * NANOS_PER_SEC + 42);
    }

    #[test]
    fn set_can_move_origin_backwards() {
        let source = ManualSource::nanos();
        let timeline = Timeline::with_source(source.clone());
        source.advance(1_000_000);

        timeline.set(0);
        assert_eq!(timeline.now(), 0);
    }

    #[test]
    fn set_rounds_to_whole_ticks() {
        let source = ManualSource::new(1_000);
        let timeline = Timeline::with_source(source.clone());

        timeline.set(1_500_000);
        assert_eq!(timeline.now(), 1_000_000);
    }

    #[test]
    fn set_is_ignored_without_rebase_support() {
        let source = ManualSource::new(1_000).with_rebase(false);
        let timeline = Timeline::with_source(source.clone());
        source.advance(3);
        let before = timeline.clock_base();

        timeline.set(60 * NANOS_PER_SEC);

        assert_eq!(timeline.clock_base(), before);
        assert_eq!(timeline.now(), 3_000_000);
    }

    #[test]
    fn platform_set_matches_declared_capability() {
        let timeline = Timeline::initialize();
        timeline.set(3_600 * NANOS_PER_SEC);

        if timeline.supports_rebase() {
            assert!(timeline.now() >= 3_600 * NANOS_PER_SEC - NANOS_PER_SEC / timeline.frequency());
        } else {
            assert!(timeline.now() < 3_600 * NANOS_PER_SEC);
        }
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    #[test]
    fn forced_fallback_reports_degraded_resolution() {
        let timeline = Timeline::from_config(TimelineConfig {
            preference: ClockPreference::Fallback,
        });

        if cfg!(any(unix, windows)) {
            assert!(timeline.is_degraded());
            assert!(timeline.frequency() <= 1_000_000);
        }
        assert!(timeline.frequency() > 0);
    }

    #[test]
    fn default_probe_is_not_degraded_on_supported_platforms() {
        let timeline = Timeline::initialize();
        assert!(!timeline.is_degraded());
        assert!(timeline.frequency() >= 1_000_000);
    }

    #[test]
    fn stamp_uses_current_time() {
        let source = ManualSource::nanos();
        let timeline = Timeline::with_source(source.clone());
        source.advance(99);

        let ev = timeline.stamp('x');
        assert_eq!(ev.at, 99);
        assert_eq!(ev.payload, 'x');
    }
}
