//! Platform clock adapters.
//!
//! Exactly one `probe` is compiled per target. It runs once, when a
//! `Timeline` is initialized, and binds the adapter for the timeline's life.

mod instant;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use instant::InstantSource;

#[cfg(unix)]
pub use unix::{MonotonicSource, WallClockSource};
#[cfg(windows)]
pub use windows::{PerformanceCounterSource, TickCountSource};

#[cfg(not(any(unix, windows)))]
pub(crate) use instant::probe;
#[cfg(unix)]
pub(crate) use unix::probe;
#[cfg(windows)]
pub(crate) use windows::probe;
