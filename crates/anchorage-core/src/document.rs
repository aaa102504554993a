//! An in-memory [`Host`] with a manual clock.
//!
//! `VirtualDocument` keeps a node arena, a listener registry, and queues of
//! pending timers and animation frames. Time only moves when the driver calls
//! [`advance`](VirtualDocument::advance), which makes every interleaving of
//! events and callbacks reproducible in a plain `#[test]`. The terminal runtime
//! uses the same document and advances it with wall-clock time.

use crate::event::HostEvent;
use crate::geometry::{Rect, Size};
use crate::host::{
    EventKind, FrameId, Host, HostError, ListenerId, ListenerTarget, NodeId, TimerId, Wakeup,
};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    class: String,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    placed: Option<Rect>,
}

/// Where a node hangs: off another node, or directly off the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Node(NodeId),
}

/// A headless document host for tests and the terminal runtime.
#[derive(Debug)]
pub struct VirtualDocument {
    nodes: HashMap<NodeId, Node>,
    root: Vec<NodeId>,
    root_styles: BTreeMap<String, String>,
    listeners: BTreeMap<ListenerId, (ListenerTarget, EventKind)>,
    timers: BTreeMap<TimerId, Duration>,
    frames: BTreeSet<FrameId>,
    hovered: Vec<NodeId>,
    viewport: Size,
    scroll_offset: f64,
    now: Duration,
    next_id: u64,
}

impl VirtualDocument {
    /// Create an empty document with the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: HashMap::new(),
            root: Vec::new(),
            root_styles: BTreeMap::new(),
            listeners: BTreeMap::new(),
            timers: BTreeMap::new(),
            frames: BTreeSet::new(),
            hovered: Vec::new(),
            viewport,
            scroll_offset: 0.0,
            now: Duration::ZERO,
            next_id: 1,
        }
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node, HostError> {
        self.nodes.get(&id).ok_or(HostError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, HostError> {
        self.nodes.get_mut(&id).ok_or(HostError::UnknownNode(id))
    }

    fn parent_of(&self, id: NodeId) -> Option<Parent> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => Some(Parent::Node(parent)),
            None if self.root.contains(&id) => Some(Parent::Root),
            None => None,
        }
    }

    fn detach(&mut self, id: NodeId) {
        match self.parent_of(id) {
            Some(Parent::Root) => self.root.retain(|n| *n != id),
            Some(Parent::Node(parent)) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|n| *n != id);
                }
            }
            None => {}
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
        self.hovered.retain(|n| self.nodes.contains_key(n));
    }

    // --- Driving -------------------------------------------------------

    /// The ids of the listeners that hear `event`, in registration order.
    pub fn dispatch(&self, event: &HostEvent) -> Vec<ListenerId> {
        let kind = event.kind();
        self.listeners
            .iter()
            .filter(|(_, (target, listener_kind))| {
                *listener_kind == kind && self.hears(*target, event)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn hears(&self, target: ListenerTarget, event: &HostEvent) -> bool {
        match target {
            ListenerTarget::Document => matches!(
                event.kind(),
                EventKind::PointerDown | EventKind::KeyDown | EventKind::FocusIn | EventKind::FocusOut
            ),
            ListenerTarget::Window => {
                matches!(event.kind(), EventKind::Scroll | EventKind::Resize)
            }
            ListenerTarget::Node(node) => match event.target() {
                Some(hit) if event.bubbles() => self.contains(node, hit),
                Some(hit) => hit == node,
                None => false,
            },
        }
    }

    /// Move the clock forward by `elapsed` and collect what came due.
    ///
    /// Pending animation frames always run first (a frame passes on every
    /// advance), followed by timers whose deadline has been reached, in
    /// deadline order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Wakeup> {
        self.now += elapsed;
        let mut due: Vec<Wakeup> = std::mem::take(&mut self.frames)
            .into_iter()
            .map(Wakeup::Frame)
            .collect();

        let mut timers: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        timers.sort();
        for (_, id) in timers {
            self.timers.remove(&id);
            due.push(Wakeup::Timer(id));
        }
        due
    }

    /// Run pending animation frames without moving the clock.
    pub fn next_frame(&mut self) -> Vec<Wakeup> {
        self.advance(Duration::ZERO)
    }

    /// The time elapsed since the document was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().min().copied()
    }

    /// Resize the viewport, returning the event to dispatch.
    pub fn resize(&mut self, viewport: Size) -> HostEvent {
        self.viewport = viewport;
        HostEvent::Resize(viewport)
    }

    /// Set the scroll offset, returning the event to dispatch.
    pub fn scroll(&mut self, top: f64) -> HostEvent {
        self.scroll_offset = top.max(0.0);
        HostEvent::Scroll
    }

    /// The deepest node under the point, preferring later (topmost) roots.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.root
            .iter()
            .rev()
            .find_map(|root| self.hit_in(*root, x, y))
    }

    fn hit_in(&self, id: NodeId, x: f64, y: f64) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        if let Some(hit) = node.children.iter().rev().find_map(|c| self.hit_in(*c, x, y)) {
            return Some(hit);
        }
        self.measure(id).contains_point(x, y).then_some(id)
    }

    /// Translate a terminal mouse event into host events, tracking hover state.
    pub fn pointer_events(&mut self, mouse: &MouseEvent) -> Vec<HostEvent> {
        let x = f64::from(mouse.column);
        let y = f64::from(mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => vec![HostEvent::PointerDown {
                target: self.hit_test(x, y),
                x,
                y,
            }],
            MouseEventKind::Moved | MouseEventKind::Drag(_) => self.hover_to(self.hit_test(x, y)),
            MouseEventKind::ScrollDown => vec![self.scroll(self.scroll_offset + 1.0)],
            MouseEventKind::ScrollUp => vec![self.scroll(self.scroll_offset - 1.0)],
            _ => Vec::new(),
        }
    }

    fn hover_to(&mut self, hit: Option<NodeId>) -> Vec<HostEvent> {
        let mut chain = Vec::new();
        let mut cursor = hit;
        while let Some(node) = cursor {
            chain.push(node);
            cursor = self.nodes.get(&node).and_then(|n| n.parent);
        }
        let mut events: Vec<HostEvent> = self
            .hovered
            .iter()
            .filter(|n| !chain.contains(n))
            .map(|n| HostEvent::PointerLeave(*n))
            .collect();
        events.extend(
            chain
                .iter()
                .rev()
                .filter(|n| !self.hovered.contains(n))
                .map(|n| HostEvent::PointerEnter(*n)),
        );
        self.hovered = chain;
        events
    }

    // --- Inspection ----------------------------------------------------

    /// Nodes attached directly to the document root, in order.
    pub fn root_nodes(&self) -> &[NodeId] {
        &self.root
    }

    /// Number of nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of pending timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of pending animation frames.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Whether the node still exists in the arena.
    pub fn exists(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.tag.as_str())
    }

    pub fn class(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.class.as_str())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.text.as_deref())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every text in the subtree of `node`, depth first.
    pub fn texts(&self, node: NodeId) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(node, &mut out);
        out
    }

    fn collect_texts<'a>(&'a self, node: NodeId, out: &mut Vec<&'a str>) {
        if let Some(n) = self.nodes.get(&node) {
            if let Some(text) = n.text.as_deref() {
                out.push(text);
            }
            for child in &n.children {
                self.collect_texts(*child, out);
            }
        }
    }
}

fn px(value: Option<&String>) -> Option<f64> {
    value?.trim().strip_suffix("px")?.parse().ok()
}

impl Host for VirtualDocument {
    fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.next());
        self.nodes.insert(
            id,
            Node {
                tag: tag.to_string(),
                ..Node::default()
            },
        );
        id
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        self.node(parent)?;
        self.node(child)?;
        self.detach(child);
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn append_to_root(&mut self, node: NodeId) -> Result<(), HostError> {
        self.node(node)?;
        self.detach(node);
        self.root.push(node);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> Result<(), HostError> {
        self.node(node)?;
        self.detach(node);
        self.drop_subtree(node);
        Ok(())
    }

    fn remove_children(&mut self, node: NodeId) -> Result<(), HostError> {
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.drop_subtree(child);
        }
        Ok(())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut cursor = node;
        loop {
            match self.parent_of(cursor) {
                Some(Parent::Root) => return true,
                Some(Parent::Node(parent)) => cursor = parent,
                None => return false,
            }
        }
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return self.nodes.contains_key(&current);
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    fn set_class(&mut self, node: NodeId, class: &str) -> Result<(), HostError> {
        self.node_mut(node)?.class = class.to_string();
        Ok(())
    }

    fn set_style(
        &mut self,
        node: NodeId,
        property: &str,
        value: Option<&str>,
    ) -> Result<(), HostError> {
        let styles = &mut self.node_mut(node)?.styles;
        match value {
            Some(value) => styles.insert(property.to_string(), value.to_string()),
            None => styles.remove(property),
        };
        Ok(())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.node_mut(node)?
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), HostError> {
        self.node_mut(node)?.text = Some(text.to_string());
        Ok(())
    }

    fn measure(&self, node: NodeId) -> Rect {
        if !self.is_attached(node) {
            return Rect::default();
        }
        let Some(n) = self.nodes.get(&node) else {
            return Rect::default();
        };
        if let Some(rect) = n.placed {
            return rect;
        }
        Rect::new(
            px(n.styles.get("top")).unwrap_or(0.0),
            px(n.styles.get("left")).unwrap_or(0.0),
            px(n.styles.get("width")).unwrap_or(0.0),
            px(n.styles.get("height")).unwrap_or(0.0),
        )
    }

    fn place(&mut self, node: NodeId, rect: Rect) -> Result<(), HostError> {
        self.node_mut(node)?.placed = Some(rect);
        Ok(())
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn root_style(&self, property: &str) -> Option<String> {
        self.root_styles.get(property).cloned()
    }

    fn set_root_style(&mut self, property: &str, value: Option<&str>) {
        match value {
            Some(value) => self.root_styles.insert(property.to_string(), value.to_string()),
            None => self.root_styles.remove(property),
        };
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn scroll_to(&mut self, top: f64) {
        self.scroll_offset = top.max(0.0);
    }

    fn add_listener(&mut self, target: ListenerTarget, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next());
        self.timers.insert(id, self.now + delay);
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    fn request_animation_frame(&mut self) -> FrameId {
        let id = FrameId(self.next());
        self.frames.insert(id);
        id
    }

    fn cancel_animation_frame(&mut self, id: FrameId) {
        self.frames.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use crossterm::event::KeyModifiers;

    fn doc() -> VirtualDocument {
        VirtualDocument::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn append_and_remove_subtree() {
        let mut doc = doc();
        let root = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(root, child).unwrap();
        doc.append_to_root(root).unwrap();
        assert!(doc.is_attached(child));
        assert!(doc.contains(root, child));

        doc.remove(root).unwrap();
        assert!(doc.root_nodes().is_empty());
        assert!(!doc.exists(child));
        assert_eq!(doc.remove(root), Err(HostError::UnknownNode(root)));
    }

    #[test]
    fn detached_nodes_measure_empty() {
        let mut doc = doc();
        let node = doc.create_element("div");
        doc.place(node, Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert!(doc.measure(node).is_empty());
        doc.append_to_root(node).unwrap();
        assert_eq!(doc.measure(node), Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn measure_reads_pixel_styles() {
        let mut doc = doc();
        let node = doc.create_element("div");
        doc.append_to_root(node).unwrap();
        doc.set_style(node, "top", Some("10px")).unwrap();
        doc.set_style(node, "left", Some("20px")).unwrap();
        doc.set_style(node, "width", Some("30px")).unwrap();
        doc.set_style(node, "height", Some("40px")).unwrap();
        assert_eq!(doc.measure(node), Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn dispatch_routes_by_target() {
        let mut doc = doc();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        doc.append_to_root(outer).unwrap();

        let on_doc = doc.add_listener(ListenerTarget::Document, EventKind::PointerDown);
        let on_outer = doc.add_listener(ListenerTarget::Node(outer), EventKind::PointerDown);
        let enter_outer = doc.add_listener(ListenerTarget::Node(outer), EventKind::PointerEnter);
        let on_window = doc.add_listener(ListenerTarget::Window, EventKind::Scroll);

        let down = HostEvent::PointerDown {
            target: Some(inner),
            x: 0.0,
            y: 0.0,
        };
        assert_eq!(doc.dispatch(&down), vec![on_doc, on_outer]);
        // enter does not bubble
        assert!(doc.dispatch(&HostEvent::PointerEnter(inner)).is_empty());
        assert_eq!(doc.dispatch(&HostEvent::PointerEnter(outer)), vec![enter_outer]);
        assert_eq!(doc.dispatch(&HostEvent::Scroll), vec![on_window]);
        assert!(doc.dispatch(&HostEvent::Key(Key::Escape)).is_empty());

        assert!(doc.remove_listener(on_doc));
        assert!(!doc.remove_listener(on_doc));
    }

    #[test]
    fn frames_run_before_due_timers() {
        let mut doc = doc();
        let late = doc.set_timeout(Duration::from_millis(200));
        let early = doc.set_timeout(Duration::from_millis(100));
        let frame = doc.request_animation_frame();

        assert_eq!(doc.advance(Duration::from_millis(50)), vec![Wakeup::Frame(frame)]);
        assert_eq!(
            doc.advance(Duration::from_millis(200)),
            vec![Wakeup::Timer(early), Wakeup::Timer(late)]
        );
        assert!(doc.advance(Duration::from_millis(500)).is_empty());
    }

    #[test]
    fn cancelled_callbacks_never_fire() {
        let mut doc = doc();
        let timer = doc.set_timeout(Duration::from_millis(10));
        let frame = doc.request_animation_frame();
        doc.clear_timeout(timer);
        doc.cancel_animation_frame(frame);
        assert!(doc.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn hit_test_prefers_topmost_deepest() {
        let mut doc = doc();
        let below = doc.create_element("div");
        let above = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_to_root(below).unwrap();
        doc.append_to_root(above).unwrap();
        doc.append_child(above, child).unwrap();
        doc.place(below, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        doc.place(above, Rect::new(10.0, 10.0, 50.0, 50.0)).unwrap();
        doc.place(child, Rect::new(20.0, 20.0, 5.0, 5.0)).unwrap();

        assert_eq!(doc.hit_test(21.0, 21.0), Some(child));
        assert_eq!(doc.hit_test(40.0, 40.0), Some(above));
        assert_eq!(doc.hit_test(90.0, 90.0), Some(below));
        assert_eq!(doc.hit_test(500.0, 500.0), None);
    }

    #[test]
    fn mouse_moves_produce_enter_and_leave() {
        let mut doc = doc();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_to_root(a).unwrap();
        doc.append_to_root(b).unwrap();
        doc.place(a, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        doc.place(b, Rect::new(0.0, 20.0, 10.0, 10.0)).unwrap();

        let moved = |column, row| MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(doc.pointer_events(&moved(2, 2)), vec![HostEvent::PointerEnter(a)]);
        assert!(doc.pointer_events(&moved(3, 3)).is_empty());
        assert_eq!(
            doc.pointer_events(&moved(22, 2)),
            vec![HostEvent::PointerLeave(a), HostEvent::PointerEnter(b)]
        );
    }

    #[test]
    fn scroll_clamps_at_zero() {
        let mut doc = doc();
        assert_eq!(doc.scroll(-5.0), HostEvent::Scroll);
        assert_eq!(doc.scroll_offset(), 0.0);
        doc.scroll(120.0);
        assert_eq!(doc.scroll_offset(), 120.0);
    }
}
