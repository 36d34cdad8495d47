//! Interactive widgets for the **trellis** widget kit.
//!
//! Every widget in this crate implements [`trellis_core::Component`], so it
//! can be driven by a [`trellis_core::Driver`] or embedded in a parent
//! component and composed within [`ratatui`] layouts.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tooltip`] | Hover/focus/click tooltip anchored to an element |
//! | [`tab_group`] | Tab strip with a sliding indicator and keyboard navigation |
//!
//! # Building blocks
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`popup`] | Anchor-relative placement with flip and shift |
//! | [`animation`] | Animation registry and the [`Animator`](animation::Animator) engine trait |
//! | [`tab`] | [`Tab`](tab::Tab) and [`TabPanel`](tab::TabPanel) children of a tab group |
//! | [`indicator`] | Active-tab indicator geometry |
//! | [`nav_scroll`] | Scroll state of an overflowing tab strip |

pub mod animation;
pub mod indicator;
pub mod nav_scroll;
pub mod popup;
pub mod tab;
pub mod tab_group;
pub mod tooltip;
