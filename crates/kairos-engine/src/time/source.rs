use std::fmt;

/// Identity of the counter backing a [`Timeline`](super::Timeline).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SourceKind {
    /// `CLOCK_MONOTONIC` (unix).
    Monotonic,
    /// `gettimeofday` (unix fallback). Microsecond resolution, not monotonic.
    WallClock,
    /// `QueryPerformanceCounter` (windows).
    PerformanceCounter,
    /// `GetTickCount64` (windows fallback). Millisecond resolution.
    TickCount,
    /// `std::time::Instant` (targets without a native adapter).
    Instant,
    /// Hand-advanced counter, see [`ManualSource`](super::ManualSource).
    Manual,
}

impl SourceKind {
    /// Returns `true` for the reduced-resolution sources used when the
    /// preferred high-resolution counter is unavailable.
    pub fn is_fallback(self) -> bool {
        matches!(self, SourceKind::WallClock | SourceKind::TickCount)
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceKind::Monotonic => "monotonic",
            SourceKind::WallClock => "wall-clock",
            SourceKind::PerformanceCounter => "performance-counter",
            SourceKind::TickCount => "tick-count",
            SourceKind::Instant => "instant",
            SourceKind::Manual => "manual",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw counter access for one platform clock.
///
/// Implementations report unscaled ticks; the [`Timeline`](super::Timeline)
/// owns the base and the conversion to nanoseconds.
pub trait ClockSource: Send + Sync + fmt::Debug {
    /// Current raw counter value.
    fn read_counter(&self) -> u64;

    /// Counter ticks per second. Must be non-zero and constant.
    fn frequency(&self) -> u64;

    /// Whether [`Timeline::set`](super::Timeline::set) may rebase this source.
    ///
    /// Sources returning `false` make `set` a documented no-op.
    fn supports_rebase(&self) -> bool;

    fn kind(&self) -> SourceKind;
}

/// Which counter `Timeline::from_config` should bind.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ClockPreference {
    /// Probe the high-resolution counter, falling back when it is unavailable.
    #[default]
    Auto,
    /// Skip probing and bind the platform fallback directly.
    Fallback,
}

/// Timeline configuration.
#[derive(Debug, Clone, Default)]
pub struct TimelineConfig {
    pub preference: ClockPreference,
}
