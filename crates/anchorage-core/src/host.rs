//! The host document abstraction.
//!
//! Everything the overlay engine does to the outside world goes through
//! [`Host`]: creating and parenting nodes, applying classes and inline styles,
//! measuring layout, registering event listeners, and scheduling timers and
//! animation frames. A browser binding implements it over the real DOM; the
//! in-memory [`VirtualDocument`](crate::document::VirtualDocument) implements it
//! for tests and for the terminal runtime.
//!
//! Listeners and scheduled callbacks are identified by opaque ids. The host
//! never calls back into components directly: when an event or a timer fires,
//! the driver delivers the id to the component that registered it (see
//! [`Component::handle_event`](crate::Component::handle_event) and
//! [`Component::wake`](crate::Component::wake)).

use crate::geometry::{Rect, Size};
use std::fmt;
use std::time::Duration;

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

host_id!(
    /// A node in the host document.
    NodeId
);
host_id!(
    /// A registered event listener.
    ListenerId
);
host_id!(
    /// A pending one-shot timer.
    TimerId
);
host_id!(
    /// A pending animation-frame callback.
    FrameId
);

/// Where a listener is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The document: hears pointer-down, key-down and focus events from anywhere.
    Document,
    /// The window: hears scroll and resize.
    Window,
    /// A specific node: hears bubbling events from its subtree and the
    /// non-bubbling enter/leave events targeted at the node itself.
    Node(NodeId),
}

/// The kind of event a listener is interested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    KeyDown,
    Scroll,
    Resize,
    PointerEnter,
    PointerLeave,
    FocusIn,
    FocusOut,
    TransitionEnd,
}

/// A scheduled callback that has come due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wakeup {
    /// A timer registered with [`Host::set_timeout`] elapsed.
    Timer(TimerId),
    /// An animation frame requested with [`Host::request_animation_frame`] ran.
    Frame(FrameId),
}

/// Errors reported by host mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The node does not exist (never created, or already removed).
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// A document-like host the overlay engine renders into.
///
/// All methods are synchronous and single-threaded; the host is the only
/// shared mutable resource and each overlay owns its own nodes and listener
/// registrations within it.
pub trait Host {
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, detaching it first if needed.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError>;

    /// Append `node` to the document root (the `body` equivalent).
    fn append_to_root(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Detach `node` and drop its whole subtree.
    fn remove(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Drop every child of `node`.
    fn remove_children(&mut self, node: NodeId) -> Result<(), HostError>;

    /// Whether `node` exists and is connected to the document root.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Replace the class attribute of `node`.
    fn set_class(&mut self, node: NodeId, class: &str) -> Result<(), HostError>;

    /// Set (or with `None`, clear) an inline style property.
    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>)
        -> Result<(), HostError>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError>;

    /// Replace the text content of `node`.
    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), HostError>;

    /// Measure `node` in viewport coordinates. Unknown or detached nodes
    /// measure as an empty rect.
    fn measure(&self, node: NodeId) -> Rect;

    /// Assign layout to `node`. Hosts with their own layout engine ignore this.
    fn place(&mut self, node: NodeId, rect: Rect) -> Result<(), HostError>;

    /// The current viewport size.
    fn viewport(&self) -> Size;

    /// Read an inline style property of the document root.
    fn root_style(&self, property: &str) -> Option<String>;

    /// Set (or clear) an inline style property of the document root.
    fn set_root_style(&mut self, property: &str, value: Option<&str>);

    /// The vertical scroll offset of the document.
    fn scroll_offset(&self) -> f64;

    /// Scroll the document to `top`.
    fn scroll_to(&mut self, top: f64);

    /// Register a listener.
    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Schedule a one-shot timer.
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Unknown ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);

    /// Request a callback before the next paint.
    fn request_animation_frame(&mut self) -> FrameId;

    /// Cancel a pending frame callback. Unknown ids are ignored.
    fn cancel_animation_frame(&mut self, id: FrameId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_kind() {
        assert_eq!(NodeId(3).to_string(), "NodeId#3");
        assert_eq!(ListenerId(12).to_string(), "ListenerId#12");
    }

    #[test]
    fn host_error_messages() {
        assert_eq!(
            HostError::UnknownNode(NodeId(7)).to_string(),
            "unknown node NodeId#7"
        );
    }
}
