//! Kairos engine crate.
//!
//! Runtime plumbing shared by windowing layers:
//! - [`time`]: a monotonic nanosecond timeline over platform counters
//! - [`event`]: a transactional queue from the input thread to the render thread
//! - [`logging`]: logger bootstrap

pub mod event;
pub mod logging;
pub mod time;
