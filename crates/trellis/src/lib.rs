//! **trellis** -- tooltip and tab group widgets for [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! trellis = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`trellis_core`] are available at the crate root
//!   ([`Component`], [`Command`], [`Subscription`], [`Driver`], [`Signal`],
//!   [`ElementId`], etc.).
//! * The [`widgets`] module re-exports everything from [`trellis_widgets`]
//!   (the tooltip, the tab group and their building blocks).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use trellis::widgets::tab::{Tab, TabPanel};
//! use trellis::widgets::tab_group::{Message, TabGroup, TabGroupEvent, TabGroupHost};
//! use trellis::{Driver, ratatui::layout::Size};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut group = TabGroup::new()
//!         .with_tab(Tab::new("general", "General").with_active(true))
//!         .with_tab(Tab::new("advanced", "Advanced"))
//!         .with_panel(TabPanel::new("general"))
//!         .with_panel(TabPanel::new("advanced"));
//!     let host = TabGroupHost::new(Size::new(80, 2), true);
//!     let attach = group.attach(host);
//!
//!     let mut driver = Driver::new(group).with_inspector(|msg| {
//!         if let Message::Event(TabGroupEvent::TabShown { name }) = msg {
//!             println!("showing {name}");
//!         }
//!     });
//!     driver.execute(attach);
//!     driver.run_until(|group| group.is_initialized()).await;
//! }
//! ```

pub use trellis_core::*;
pub mod widgets {
    pub use trellis_widgets::*;
}

// Re-export dependencies for downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
