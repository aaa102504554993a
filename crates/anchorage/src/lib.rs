//! **anchorage** -- Tailwind-style class composition and anchored overlays,
//! runnable in the terminal on top of [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! anchorage = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`anchorage_core`] are available at the crate
//!   root ([`merge`], [`ClassList`], [`VirtualDocument`], [`Component`],
//!   [`Model`], [`Program`], [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from
//!   [`anchorage_widgets`] (overlay engine, popover, select, sidebar,
//!   backdrop, scroll-to-top).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use anchorage::widgets::popover::{self, Popover, PopoverOptions};
//! use anchorage::{Command, Component, Host, HostEvent, ListenerId, Model, Rect, Wakeup};
//!
//! struct App { help: Popover }
//!
//! impl Component for App {
//!     type Message = popover::Message;
//!     fn update(&mut self, host: &mut dyn Host, msg: popover::Message) -> Command<popover::Message> {
//!         self.help.update(host, msg)
//!     }
//!     fn handle_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Command<popover::Message> {
//!         self.help.handle_event(host, id, event)
//!     }
//!     fn wake(&mut self, host: &mut dyn Host, wakeup: Wakeup) -> Command<popover::Message> {
//!         self.help.wake(host, wakeup)
//!     }
//! }
//!
//! impl Model for App {
//!     type Flags = ();
//!     fn init(_: (), host: &mut dyn Host) -> (Self, Command<popover::Message>) {
//!         let button = host.create_element("button");
//!         host.place(button, Rect::new(1.0, 2.0, 10.0, 3.0)).unwrap();
//!         host.append_to_root(button).unwrap();
//!         let mut help = Popover::new(PopoverOptions::default());
//!         help.bind(host, button).unwrap();
//!         (App { help }, Command::none())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     anchorage::run::<App>(()).await.unwrap();
//! }
//! ```

pub use anchorage_core::*;
pub mod widgets {
    pub use anchorage_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
