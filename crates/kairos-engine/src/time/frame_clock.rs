use std::time::Duration;

use super::timeline::Timeline;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameTime {
    /// Clamped time since the previous tick.
    pub dt: Duration,

    /// Timeline position at the tick, in nanoseconds.
    pub now: u64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}

/// Frame pacing over a [`Timeline`].
///
/// Keep one `FrameClock` per render loop. The clock does not own the timeline;
/// pass the same one to every call.
///
/// Delta time is clamped so that debugger pauses, minimized windows, or a
/// backwards `Timeline::set` do not produce zero or huge steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: u64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock with a 100 µs floor and a 250 ms ceiling.
    pub fn new(timeline: &Timeline) -> Self {
        Self::with_clamps(timeline, Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(timeline: &Timeline, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: timeline.now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Rebaselines to the timeline's current position.
    pub fn reset(&mut self, timeline: &Timeline) {
        self.last = timeline.now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self, timeline: &Timeline) -> FrameTime {
        let now = timeline.now();
        let dt = Duration::from_nanos(now.saturating_sub(self.last))
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}
