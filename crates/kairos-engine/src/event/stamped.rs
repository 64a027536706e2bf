/// An event payload tagged with the timeline position at which it arrived.
///
/// Produced by [`Timeline::stamp`](crate::time::Timeline::stamp) on the input
/// thread and carried through an [`EventPool`](super::EventPool) unchanged.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Stamped<T> {
    /// Timeline nanoseconds at capture.
    pub at: u64,
    pub payload: T,
}

impl<T> Stamped<T> {
    pub fn new(at: u64, payload: T) -> Self {
        Self { at, payload }
    }

    /// Nanoseconds between capture and `now`, or zero if `now` is earlier
    /// (e.g. after the timeline was rebased backwards).
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.at)
    }

    pub fn map<U, F>(self, f: F) -> Stamped<U>
    where
        F: FnOnce(T) -> U,
    {
        Stamped {
            at: self.at,
            payload: f(self.payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventPool;
    use crate::time::{ManualSource, Timeline};

    #[test]
    fn age_saturates_after_backwards_rebase() {
        let ev = Stamped::new(1_000, 'a');
        assert_eq!(ev.age(1_500), 500);
        assert_eq!(ev.age(10), 0);
    }

    #[test]
    fn map_keeps_timestamp() {
        let ev = Stamped::new(7, 65_u32).map(char::from_u32);
        assert_eq!(ev, Stamped::new(7, Some('A')));
    }

    #[test]
    fn stamped_events_cross_the_pool_in_capture_order() {
        let source = ManualSource::nanos();
        let timeline = Timeline::with_source(source.clone());
        let pool = EventPool::new();

        for code in [72_u32, 105] {
            source.advance(1_000);
            pool.add(timeline.stamp(code));
        }

        let events: Vec<_> = pool.begin_consume().collect();
        assert_eq!(events, vec![Stamped::new(1_000, 72), Stamped::new(2_000, 105)]);
    }
}
