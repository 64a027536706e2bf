use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::scale::{nanos_to_ticks, NANOS_PER_SEC};
use super::source::{ClockSource, SourceKind};

/// A counter that only moves when told to.
///
/// Clones share the same counter, so a test can hand one clone to a
/// [`Timeline`](super::Timeline) and keep another to drive it.
///
/// ```
/// use kairos_engine::time::{ManualSource, Timeline};
///
/// let source = ManualSource::new(1_000);
/// let timeline = Timeline::with_source(source.clone());
///
/// source.advance(3);
/// assert_eq!(timeline.now(), 3_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct ManualSource {
    ticks: Arc<AtomicU64>,
    frequency: u64,
    rebase: bool,
}

impl ManualSource {
    /// Creates a source at tick zero running at `frequency` Hz, with rebasing enabled.
    pub fn new(frequency: u64) -> Self {
        debug_assert!(frequency > 0);
        Self {
            ticks: Arc::new(AtomicU64::new(0)),
            frequency,
            rebase: true,
        }
    }

    /// A 1 GHz source, so ticks read as nanoseconds.
    pub fn nanos() -> Self {
        Self::new(NANOS_PER_SEC)
    }

    /// Enables or disables rebasing through `Timeline::set`.
    pub fn with_rebase(mut self, rebase: bool) -> Self {
        self.rebase = rebase;
        self
    }

    /// Starts the counter at `ticks` instead of zero.
    pub fn starting_at(self, ticks: u64) -> Self {
        self.ticks.store(ticks, Ordering::Relaxed);
        self
    }

    pub fn advance(&self, ticks: u64) {
        self.ticks.fetch_add(ticks, Ordering::Relaxed);
    }

    /// Advances by the whole number of ticks covering `nanos`.
    pub fn advance_nanos(&self, nanos: u64) {
        self.advance(nanos_to_ticks(nanos, self.frequency));
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl ClockSource for ManualSource {
    fn read_counter(&self) -> u64 {
        self.ticks()
    }

    fn frequency(&self) -> u64 {
        self.frequency
    }

    fn supports_rebase(&self) -> bool {
        self.rebase
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_counter() {
        let a = ManualSource::new(1_000);
        let b = a.clone();

        a.advance(5);
        assert_eq!(b.read_counter(), 5);
    }

    #[test]
    fn advance_nanos_rounds_down_to_ticks() {
        let source = ManualSource::new(1_000);
        source.advance_nanos(2_999_999);
        assert_eq!(source.ticks(), 2);
    }

    #[test]
    fn counter_wraps_like_hardware() {
        let source = ManualSource::nanos().starting_at(u64::MAX);
        source.advance(2);
        assert_eq!(source.ticks(), 1);
    }
}
