//! Core runtime for the **trellis** widget kit.
//!
//! `trellis-core` provides the pieces interactive widgets are built from.
//! The design follows the [Elm Architecture]: a widget is a [`Component`]
//! whose `update` reacts to messages and returns [`Command`]s for side
//! effects, and whose long-lived event sources are [`Subscription`]s that the
//! runtime starts and stops by diffing.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Component`] | Widget trait (update / view / subscriptions) |
//! | [`Command`] | A side effect: a deferred message, a future, a timer |
//! | [`Subscription`] | Long-lived event source, attached while returned |
//! | [`Signal`] | Host-owned value observed by [`ResizeObserver`] / [`IntersectionObserver`] |
//! | [`Debounce`] | Single-slot debounced action, last writer wins |
//! | [`ElementId`] | Stable opaque handle for an element |
//! | [`Localize`] | Text direction and term lookup |
//! | [`Driver`] | Headless event loop running one component on tokio |
//! | [`TestComponent`](testing::TestComponent) | Synchronous harness for unit tests |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod debounce;
pub mod duration;
pub mod element;
pub mod runtime;
pub mod signal;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use debounce::{Debounce, Token};
pub use duration::{parse_duration, DurationError};
pub use element::{Direction, ElementId, Locale, Localize};
pub use runtime::Driver;
pub use signal::Signal;
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{Every, IntersectionObserver, ResizeObserver, FRAME};
