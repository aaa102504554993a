//! Anchored overlays and the components built on them.
//!
//! The engine is split into small pieces that [`Overlay`] composes:
//!
//! * [`portal`] mounts a panel at the document root, positions it against
//!   its anchor and runs the enter and exit transitions.
//! * [`dismiss`] binds the trigger (click, hover, focus or manual) and
//!   closes the panel on outside presses and Escape.
//! * [`scroll_lock`] is the reference-counted document scroll lock.
//! * [`content`] describes what a panel shows.
//!
//! Every component implements [`anchorage_core::Component`] and can be
//! driven by a [`Program`](anchorage_core::Program) or unit-tested with
//! [`Stage`](anchorage_core::testing::Stage).
//!
//! # Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`popover`] | Floating panel with header, footer and arrow |
//! | [`select`] | Single and multi-select dropdown with filtering |
//! | [`sidebar`] | Drawer docked to a viewport edge |
//! | [`backdrop`] | Dimmed full-viewport backdrop with a centered panel |
//! | [`scroll_top`] | Button that returns the document to the top |

pub mod backdrop;
pub mod content;
pub mod dismiss;
pub mod overlay;
pub mod popover;
pub mod portal;
pub mod scroll_lock;
pub mod scroll_top;
pub mod select;
pub mod sidebar;

pub use backdrop::{Backdrop, BackdropOptions, Blur, Opacity, Scrim};
pub use content::{Arrow, PanelContent, PanelLine, Section};
pub use dismiss::{DismissConfig, DismissController, DismissRequest, Trigger};
pub use overlay::{Closed, Overlay, OverlayError, OverlayEvent, OverlayOptions};
pub use popover::{Popover, PopoverOptions};
pub use portal::{PanelAnchor, PortalHandle, PortalId, PortalManager, PortalState};
pub use scroll_lock::{ScrollLock, ScrollLockToken};
pub use scroll_top::{ScrollTop, ScrollTopOptions, ScrollTopPosition, ScrollTopVariant};
pub use select::{Select, SelectOption, SelectOptions};
pub use sidebar::{Sidebar, SidebarOptions, SidebarSize};
