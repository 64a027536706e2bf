//! Time subsystem.
//!
//! Normalizes platform counters into one nanosecond timeline:
//! - [`ClockSource`] adapters read raw ticks (`CLOCK_MONOTONIC`,
//!   `QueryPerformanceCounter`, and their reduced-resolution fallbacks)
//! - [`Timeline`] owns the base, scales ticks to nanoseconds, and rebases on `set`
//! - [`FrameClock`] turns timeline readings into clamped per-frame deltas
//!
//! Intended usage: one `Timeline` per program, created at startup and shared
//! by reference; one `FrameClock` per render loop.

mod frame_clock;
mod manual;
pub mod platform;
pub mod scale;
mod source;
mod timeline;

pub use frame_clock::{FrameClock, FrameTime};
pub use manual::ManualSource;
pub use platform::InstantSource;
pub use source::{ClockPreference, ClockSource, SourceKind, TimelineConfig};
pub use timeline::{ClockBase, Timeline};
