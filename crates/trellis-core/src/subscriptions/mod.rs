//! Built-in subscription sources.
//!
//! - **Timers** ([`Every`]) -- repeating ticks, used for frame-paced
//!   animation such as smooth scrolling.
//! - **Observers** ([`ResizeObserver`], [`IntersectionObserver`]) -- watch a
//!   host-owned [`Signal`](crate::Signal) for size or visibility changes.

mod observer;
mod timer;

pub use observer::*;
pub use timer::*;
