//! Event subsystem.
//!
//! [`EventPool`] hands events from producer threads (typically the OS input
//! thread) to one consumer thread (typically the render loop) without loss,
//! duplication, or reordering. [`Stamped`] pairs a payload with its capture time.

mod pool;
mod stamped;

pub use pool::{Consumption, EventPool};
pub use stamped::Stamped;
