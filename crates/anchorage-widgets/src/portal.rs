//! Portal lifecycle: mounting a floating panel at the document root.
//!
//! A portal is a fixed, full-document root node holding one absolutely
//! positioned panel. [`PortalManager`] owns at most one live [`PortalHandle`]
//! and walks it through
//!
//! ```text
//! Closed → Mounting → Positioned → Visible → Unmounting → Disposed
//! ```
//!
//! * `mount` builds the nodes, applies the merged classes while the panel is
//!   still detached, appends, positions once and requests the animation frame
//!   that fades the panel in.
//! * `begin_close` cancels a pending enter frame, applies the exit styles and
//!   schedules disposal after the animation duration. A `transitionend` on the
//!   panel disposes early.
//! * `force_dispose` removes everything synchronously.
//!
//! The manager only mutates its own nodes, listeners, timers and frames; it
//! reports disposals to its owner, which turns them into lifecycle events.

use crate::content::{Arrow, PanelContent};
use crate::overlay::OverlayError;
use anchorage_core::geometry::resolve;
use anchorage_core::{
    ClassList, EventKind, FrameId, Host, HostError, HostEvent, ListenerId, ListenerTarget, NodeId, Placement,
    PositionOptions, Rect, Size, TimerId,
};
use std::fmt;
use std::time::Duration;

/// Stacking order of every portal root.
pub const PORTAL_Z_INDEX: &str = "9999";

const HIDDEN_SCALE: &str = "scale(0.95)";

/// Identifies one mount. Re-opening an overlay produces a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId(pub u64);

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "portal#{}", self.0)
    }
}

/// Where a portal's state machine is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalState {
    #[default]
    Closed,
    Mounting,
    Positioned,
    Visible,
    Unmounting,
    Disposed,
}

impl PortalState {
    /// Mounted and not on its way out.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Mounting | Self::Positioned | Self::Visible)
    }
}

/// What the panel is positioned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAnchor {
    /// Next to a node, on the requested side.
    Node(NodeId),
    /// Centered in the viewport.
    Centered,
    /// Flush against a viewport edge, spanning the other axis (drawers).
    Docked(Placement),
}

impl From<NodeId> for PanelAnchor {
    fn from(node: NodeId) -> Self {
        PanelAnchor::Node(node)
    }
}

impl From<Option<NodeId>> for PanelAnchor {
    fn from(node: Option<NodeId>) -> Self {
        node.map_or(PanelAnchor::Centered, PanelAnchor::Node)
    }
}

/// Everything needed to mount a panel.
#[derive(Debug, Clone, Copy)]
pub struct MountRequest<'a> {
    pub anchor: PanelAnchor,
    pub content: &'a PanelContent,
    /// Merged panel classes.
    pub class: &'a ClassList,
    pub placement: Placement,
    pub position: PositionOptions,
}

/// One mounted portal.
#[derive(Debug)]
pub struct PortalHandle {
    id: PortalId,
    root: NodeId,
    panel: NodeId,
    lines: Vec<NodeId>,
    arrow: Option<(NodeId, Arrow)>,
    anchor: PanelAnchor,
    placement: Placement,
    resolved: Placement,
    position: PositionOptions,
    size: Size,
    state: PortalState,
    enter_frame: Option<FrameId>,
    dispose_timer: Option<TimerId>,
    transition_listener: Option<ListenerId>,
}

impl PortalHandle {
    pub fn id(&self) -> PortalId {
        self.id
    }

    /// The fixed root appended to the document root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The panel holding the content.
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// Body line nodes, in order.
    pub fn lines(&self) -> &[NodeId] {
        &self.lines
    }

    pub fn anchor(&self) -> PanelAnchor {
        self.anchor
    }

    pub fn state(&self) -> PortalState {
        self.state
    }

    /// The side used by the last positioning pass.
    pub fn placement(&self) -> Placement {
        self.resolved
    }

    /// The panel's current size.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Drives the portal of one overlay.
#[derive(Debug)]
pub struct PortalManager {
    current: Option<PortalHandle>,
    next_id: u64,
    animation: Duration,
}

impl PortalManager {
    /// A manager whose exit transition lasts `animation`.
    pub fn new(animation: Duration) -> Self {
        Self {
            current: None,
            next_id: 0,
            animation,
        }
    }

    pub fn state(&self) -> PortalState {
        self.current.as_ref().map_or(PortalState::Closed, |h| h.state)
    }

    /// The current handle, including a disposed one.
    pub fn handle(&self) -> Option<&PortalHandle> {
        self.current.as_ref()
    }

    /// The current handle while it is attached to the document.
    pub fn live(&self) -> Option<&PortalHandle> {
        self.current.as_ref().filter(|h| h.state != PortalState::Disposed)
    }

    /// Build, attach and position a new portal.
    ///
    /// Fails with [`OverlayError::AlreadyOpen`] unless the previous portal is
    /// gone.
    pub fn mount(&mut self, host: &mut dyn Host, request: MountRequest<'_>) -> Result<PortalId, OverlayError> {
        if self.live().is_some() {
            return Err(OverlayError::AlreadyOpen);
        }
        self.next_id += 1;
        let id = PortalId(self.next_id);

        let root = host.create_element("div");
        let panel = host.create_element("div");
        let handle = match self.build(host, id, root, panel, request) {
            Ok(handle) => handle,
            Err(err) => {
                // the panel may not have reached the root yet
                for node in [panel, root] {
                    if let Err(cleanup) = host.remove(node) {
                        tracing::debug!(portal = %id, node = %node, error = %cleanup, "partial portal node already gone");
                    }
                }
                return Err(err.into());
            }
        };
        self.current = Some(handle);
        tracing::debug!(portal = %id, "portal mounted");

        self.reposition(host);
        if let Some(handle) = self.current.as_mut() {
            handle.enter_frame = Some(host.request_animation_frame());
        }
        Ok(id)
    }

    fn build(
        &self,
        host: &mut dyn Host,
        id: PortalId,
        root: NodeId,
        panel: NodeId,
        request: MountRequest<'_>,
    ) -> Result<PortalHandle, HostError> {
        host.set_attribute(root, "data-portal", &id.0.to_string())?;
        for (property, value) in [
            ("position", "fixed"),
            ("z-index", PORTAL_Z_INDEX),
            ("top", "0"),
            ("left", "0"),
            ("pointer-events", "none"),
        ] {
            host.set_style(root, property, Some(value))?;
        }

        if !request.class.is_empty() {
            host.set_class(panel, &request.class.to_string())?;
        }
        let ms = self.animation.as_millis();
        let transition = format!("opacity {ms}ms ease-out, transform {ms}ms ease-out");
        for (property, value) in [
            ("position", "absolute"),
            ("pointer-events", "auto"),
            ("opacity", "0"),
            ("transform", HIDDEN_SCALE),
            ("transition", transition.as_str()),
        ] {
            host.set_style(panel, property, Some(value))?;
        }

        let rendered = request.content.render_into(host, panel, request.placement)?;
        let size = request.content.panel_size();
        set_px(host, panel, "width", size.width)?;
        set_px(host, panel, "height", size.height)?;

        host.append_child(root, panel)?;
        host.append_to_root(root)?;

        let arrow = rendered
            .arrow
            .zip(request.content.arrow.clone());
        Ok(PortalHandle {
            id,
            root,
            panel,
            lines: rendered.lines,
            arrow,
            anchor: request.anchor,
            placement: request.placement,
            resolved: request.placement,
            position: request.position,
            size,
            state: PortalState::Mounting,
            enter_frame: None,
            dispose_timer: None,
            transition_listener: None,
        })
    }

    /// Measure and position the panel again.
    ///
    /// Only mounted, not-closing portals move. A panel anchored to a node that
    /// has left the document keeps its last position.
    pub fn reposition(&mut self, host: &mut dyn Host) {
        let Some(handle) = self.current.as_mut().filter(|h| h.state.is_open()) else {
            return;
        };
        let viewport = host.viewport();
        let rect = match handle.anchor {
            PanelAnchor::Node(anchor) => {
                if !host.is_attached(anchor) {
                    tracing::debug!(portal = %handle.id, anchor = %anchor, "anchor detached, position kept");
                    return;
                }
                let resolved = resolve(
                    host.measure(anchor),
                    handle.size,
                    handle.placement,
                    viewport,
                    &handle.position,
                );
                handle.resolved = resolved.placement;
                if let Some(width) = resolved.width {
                    handle.size.width = width;
                }
                Rect::new(resolved.top, resolved.left, handle.size.width, handle.size.height)
            }
            PanelAnchor::Centered => Rect::new(
                ((viewport.height - handle.size.height) / 2.0).max(0.0),
                ((viewport.width - handle.size.width) / 2.0).max(0.0),
                handle.size.width,
                handle.size.height,
            ),
            PanelAnchor::Docked(edge) => docked(edge, handle.size, viewport),
        };
        if let Err(err) = apply_rect(host, handle.panel, rect) {
            tracing::warn!(portal = %handle.id, error = %err, "failed to position panel");
            return;
        }
        if let Some((node, arrow)) = &handle.arrow {
            let class = arrow.class_for(handle.resolved).to_string();
            if let Err(err) = host.set_class(*node, &class) {
                tracing::warn!(portal = %handle.id, error = %err, "failed to update arrow");
            }
        }
        if handle.state == PortalState::Mounting {
            handle.state = PortalState::Positioned;
        }
        tracing::trace!(portal = %handle.id, top = rect.top, left = rect.left, "panel positioned");
    }

    /// Render new content into the open panel and position it again.
    pub fn replace_content(&mut self, host: &mut dyn Host, content: &PanelContent) -> Result<(), HostError> {
        let Some(handle) = self.current.as_mut().filter(|h| h.state.is_open()) else {
            return Ok(());
        };
        host.remove_children(handle.panel)?;
        let rendered = content.render_into(host, handle.panel, handle.resolved)?;
        handle.lines = rendered.lines;
        handle.arrow = rendered.arrow.zip(content.arrow.clone());
        handle.size = content.panel_size();
        set_px(host, handle.panel, "width", handle.size.width)?;
        set_px(host, handle.panel, "height", handle.size.height)?;
        self.reposition(host);
        Ok(())
    }

    /// Deliver an animation frame. Returns whether it was the enter frame.
    pub fn on_frame(&mut self, host: &mut dyn Host, frame: FrameId) -> bool {
        let Some(handle) = self.current.as_mut() else {
            return false;
        };
        if handle.enter_frame != Some(frame) {
            return false;
        }
        handle.enter_frame = None;
        let shown = host
            .set_style(handle.panel, "opacity", Some("1"))
            .and_then(|()| host.set_style(handle.panel, "transform", Some("scale(1)")));
        if let Err(err) = shown {
            tracing::warn!(portal = %handle.id, error = %err, "failed to apply enter styles");
        }
        handle.state = PortalState::Visible;
        tracing::debug!(portal = %handle.id, "portal visible");
        true
    }

    /// Start the exit transition. Returns `false` when nothing is open.
    pub fn begin_close(&mut self, host: &mut dyn Host) -> bool {
        let Some(handle) = self.current.as_mut().filter(|h| h.state.is_open()) else {
            return false;
        };
        if let Some(frame) = handle.enter_frame.take() {
            host.cancel_animation_frame(frame);
        }
        let hidden = host
            .set_style(handle.panel, "opacity", Some("0"))
            .and_then(|()| host.set_style(handle.panel, "transform", Some(HIDDEN_SCALE)));
        if let Err(err) = hidden {
            tracing::warn!(portal = %handle.id, error = %err, "failed to apply exit styles");
        }
        handle.state = PortalState::Unmounting;
        handle.dispose_timer = Some(host.set_timeout(self.animation));
        handle.transition_listener =
            Some(host.add_listener(ListenerTarget::Node(handle.panel), EventKind::TransitionEnd));
        tracing::debug!(portal = %handle.id, "portal closing");
        true
    }

    /// Deliver a timer. Returns the disposed portal when it was the disposal timer.
    pub fn on_timer(&mut self, host: &mut dyn Host, timer: TimerId) -> Option<PortalId> {
        let due = self
            .current
            .as_ref()
            .is_some_and(|h| h.dispose_timer == Some(timer));
        if !due {
            return None;
        }
        if let Some(handle) = self.current.as_mut() {
            handle.dispose_timer = None;
        }
        self.dispose(host)
    }

    /// Whether `id` is this manager's transition listener.
    pub fn owns(&self, id: ListenerId) -> bool {
        self.live().is_some_and(|h| h.transition_listener == Some(id))
    }

    /// Deliver an event. A transition end on the closing panel disposes it.
    pub fn on_event(&mut self, host: &mut dyn Host, id: ListenerId, event: &HostEvent) -> Option<PortalId> {
        let handle = self.live()?;
        let ends = handle.transition_listener == Some(id)
            && *event == HostEvent::TransitionEnd(handle.panel);
        if ends {
            self.dispose(host)
        } else {
            None
        }
    }

    /// Remove the portal now, whatever state it is in.
    pub fn force_dispose(&mut self, host: &mut dyn Host) -> Option<PortalId> {
        self.dispose(host)
    }

    fn dispose(&mut self, host: &mut dyn Host) -> Option<PortalId> {
        let handle = self.current.as_mut().filter(|h| h.state != PortalState::Disposed)?;
        if let Some(frame) = handle.enter_frame.take() {
            host.cancel_animation_frame(frame);
        }
        if let Some(timer) = handle.dispose_timer.take() {
            host.clear_timeout(timer);
        }
        if let Some(listener) = handle.transition_listener.take() {
            host.remove_listener(listener);
        }
        if let Err(err) = host.remove(handle.root) {
            tracing::warn!(portal = %handle.id, error = %err, "portal root already gone");
        }
        handle.state = PortalState::Disposed;
        tracing::debug!(portal = %handle.id, "portal disposed");
        Some(handle.id)
    }
}

fn docked(edge: Placement, size: Size, viewport: Size) -> Rect {
    match edge {
        Placement::Left => Rect::new(0.0, 0.0, size.width, viewport.height),
        Placement::Right => Rect::new(0.0, viewport.width - size.width, size.width, viewport.height),
        Placement::Top => Rect::new(0.0, 0.0, viewport.width, size.height),
        Placement::Bottom => Rect::new(viewport.height - size.height, 0.0, viewport.width, size.height),
    }
}

fn apply_rect(host: &mut dyn Host, node: NodeId, rect: Rect) -> Result<(), HostError> {
    set_px(host, node, "top", rect.top)?;
    set_px(host, node, "left", rect.left)?;
    set_px(host, node, "width", rect.width)?;
    set_px(host, node, "height", rect.height)
}

fn set_px(host: &mut dyn Host, node: NodeId, property: &str, value: f64) -> Result<(), HostError> {
    host.set_style(node, property, Some(&format!("{value}px")))
}
