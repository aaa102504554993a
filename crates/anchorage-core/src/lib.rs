//! Core of the **anchorage** overlay toolkit.
//!
//! `anchorage-core` holds the two pieces every overlay-bearing component is
//! built from, plus the runtime that drives components in a terminal:
//!
//! * **Style composition.** Utility classes are classified into semantic
//!   property groups and merged so that later classes override earlier ones
//!   in the same group ([`merge`], [`ClassList`], [`tw_merge!`]).
//! * **Anchored geometry.** [`geometry::resolve`] places a floating panel
//!   next to an anchor rectangle and clamps it into the viewport.
//! * **The host document.** Components talk to a [`Host`]: nodes, classes,
//!   inline styles, listeners, timers and animation frames.
//!   [`VirtualDocument`] is the in-memory implementation used by tests and by
//!   the terminal [`Program`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ClassList`] | Ordered, conflict-resolved set of utility classes |
//! | [`ClassService`] | Merging bound to a [`StyleConfig`] theme |
//! | [`Host`] | Document abstraction components render into |
//! | [`VirtualDocument`] | Headless host with a manual clock |
//! | [`Component`] | Stateful UI living in a host, driven by events and wakeups |
//! | [`Model`] | Top-level component run by a [`Program`] |
//! | [`Command`] | Side effect or message returned from a component |
//! | [`Stage`](testing::Stage) | Headless harness for unit-testing a [`Component`] |
//!
//! # Quick example
//!
//! ```
//! use anchorage_core::geometry::{resolve, Placement, PositionOptions, Rect, Size};
//! use anchorage_core::tw_merge;
//!
//! let class = tw_merge!("px-4 py-2 bg-blue-600", "bg-red-600");
//! assert_eq!(class, "px-4 py-2 bg-red-600");
//!
//! let pos = resolve(
//!     Rect::new(10.0, 5.0, 40.0, 20.0),
//!     Size::new(200.0, 100.0),
//!     Placement::Bottom,
//!     Size::new(1024.0, 768.0),
//!     &PositionOptions::default(),
//! );
//! assert_eq!((pos.top, pos.left), (38.0, 8.0));
//! ```

pub mod classify;
pub mod command;
pub mod component;
pub mod config;
pub mod document;
pub mod event;
pub mod geometry;
pub mod host;
pub mod merge;
pub mod model;
pub mod render;
pub mod runtime;
pub mod testing;
pub mod text;

pub use classify::{classify, ClassGroup, MergeKey, UtilityToken};
pub use command::Command;
pub use component::Component;
pub use config::{ClassService, ConfigError, StyleConfig, ThemeConfig};
pub use document::VirtualDocument;
pub use event::{HostEvent, Key};
pub use geometry::{Placement, PositionOptions, Rect, ResolvedPosition, Size};
pub use host::{EventKind, FrameId, Host, HostError, ListenerId, ListenerTarget, NodeId, TimerId, Wakeup};
pub use merge::{conditional, join, merge, ClassList};
pub use model::Model;
pub use runtime::{log_to_file, Driver, OutputTarget, Program, ProgramError, ProgramHandle, ProgramOptions};

/// Run an anchorage application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
