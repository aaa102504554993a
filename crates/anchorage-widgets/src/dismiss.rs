//! Deciding when an overlay should open, close, or move.
//!
//! A [`DismissController`] owns two sets of listeners. The *trigger*
//! listeners live on the anchor for as long as the controller is bound to it
//! and implement the open gesture (click or hover). The
//! [`DismissSubscription`] exists only while a panel is open and watches for
//! the ways it can go away: a pointer press outside, Escape, and the scroll
//! and resize events that require re-measuring. The controller never touches
//! the panel itself; it answers each event with a [`DismissRequest`] and the
//! owning overlay carries it out.

use anchorage_core::{
    EventKind, Host, HostEvent, Key, ListenerId, ListenerTarget, NodeId, TimerId,
};
use std::time::Duration;

/// How an overlay is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// Pressing the anchor toggles the overlay.
    #[default]
    Click,
    /// Hovering the anchor opens it after a delay; leaving closes it.
    Hover,
    /// Opened and closed by the caller from its own focus handling.
    Focus,
    /// Only explicit `open`/`close` calls.
    Manual,
}

/// What the controller wants the overlay to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissRequest {
    Show,
    Close,
    Toggle,
    /// The layout changed; measure and position again.
    Reposition,
}

/// Dismiss behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct DismissConfig {
    pub trigger: Trigger,
    /// Debounce for hover open and close.
    pub hover_delay: Duration,
    /// Close on a pointer press outside the anchor and panel. Hover
    /// overlays never close this way.
    pub dismissible: bool,
    pub close_on_escape: bool,
    /// Nodes whose subtrees never count as "outside".
    pub exclude: Vec<NodeId>,
}

impl Default for DismissConfig {
    fn default() -> Self {
        Self {
            trigger: Trigger::Click,
            hover_delay: Duration::from_millis(200),
            dismissible: true,
            close_on_escape: true,
            exclude: Vec::new(),
        }
    }
}

/// The listeners registered for one open panel.
///
/// Removal happens at most once; a second [`detach`](Self::detach) is a no-op.
#[derive(Debug)]
pub struct DismissSubscription {
    pointer_down: ListenerId,
    key_down: ListenerId,
    scroll: ListenerId,
    resize: ListenerId,
    panel_hover: Option<(ListenerId, ListenerId)>,
    inside: Vec<NodeId>,
    disposed: bool,
}

impl DismissSubscription {
    /// Register the listeners. Presses inside any of the `inside` subtrees
    /// are not outside presses; `hover_panel` also gets enter/leave listeners.
    pub fn attach(host: &mut dyn Host, inside: Vec<NodeId>, hover_panel: Option<NodeId>) -> Self {
        let panel_hover = hover_panel.map(|panel| {
            (
                host.add_listener(ListenerTarget::Node(panel), EventKind::PointerEnter),
                host.add_listener(ListenerTarget::Node(panel), EventKind::PointerLeave),
            )
        });
        let subscription = Self {
            pointer_down: host.add_listener(ListenerTarget::Document, EventKind::PointerDown),
            key_down: host.add_listener(ListenerTarget::Document, EventKind::KeyDown),
            scroll: host.add_listener(ListenerTarget::Window, EventKind::Scroll),
            resize: host.add_listener(ListenerTarget::Window, EventKind::Resize),
            panel_hover,
            inside,
            disposed: false,
        };
        tracing::trace!(inside = ?subscription.inside, "dismiss listeners attached");
        subscription
    }

    pub fn detach(&mut self, host: &mut dyn Host) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for id in self.ids() {
            host.remove_listener(id);
        }
        tracing::trace!(inside = ?self.inside, "dismiss listeners detached");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ids(&self) -> impl Iterator<Item = ListenerId> {
        let hover = self.panel_hover.into_iter().flat_map(|(enter, leave)| [enter, leave]);
        [self.pointer_down, self.key_down, self.scroll, self.resize]
            .into_iter()
            .chain(hover)
    }

    fn owns(&self, id: ListenerId) -> bool {
        !self.disposed && self.ids().any(|own| own == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoverIntent {
    Show,
    Hide,
}

/// Turns host events into open/close/reposition requests for one overlay.
#[derive(Debug)]
pub struct DismissController {
    config: DismissConfig,
    anchor: Option<NodeId>,
    trigger_listeners: Vec<ListenerId>,
    subscription: Option<DismissSubscription>,
    hover_timer: Option<(TimerId, HoverIntent)>,
}

impl DismissController {
    pub fn new(config: DismissConfig) -> Self {
        Self {
            config,
            anchor: None,
            trigger_listeners: Vec::new(),
            subscription: None,
            hover_timer: None,
        }
    }

    pub fn config(&self) -> &DismissConfig {
        &self.config
    }

    pub fn anchor(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Install the trigger listeners on `anchor`, replacing any previous binding.
    pub fn bind(&mut self, host: &mut dyn Host, anchor: NodeId) {
        self.unbind(host);
        let kinds: &[EventKind] = match self.config.trigger {
            Trigger::Click => &[EventKind::PointerDown],
            Trigger::Hover => &[EventKind::PointerEnter, EventKind::PointerLeave],
            Trigger::Focus | Trigger::Manual => &[],
        };
        self.trigger_listeners = kinds
            .iter()
            .map(|kind| host.add_listener(ListenerTarget::Node(anchor), *kind))
            .collect();
        self.anchor = Some(anchor);
    }

    /// Remove the trigger listeners and any pending hover timer.
    pub fn unbind(&mut self, host: &mut dyn Host) {
        for id in self.trigger_listeners.drain(..) {
            host.remove_listener(id);
        }
        self.cancel_hover(host);
        self.anchor = None;
    }

    /// Start watching an open panel. `anchor` is the node the panel was
    /// opened against; presses on it are not outside presses even when it
    /// differs from the bound trigger.
    pub fn attach(&mut self, host: &mut dyn Host, panel: NodeId, anchor: Option<NodeId>) {
        self.detach(host);
        let hover_panel = (self.config.trigger == Trigger::Hover).then_some(panel);
        let inside = std::iter::once(panel).chain(anchor).collect();
        self.subscription = Some(DismissSubscription::attach(host, inside, hover_panel));
    }

    /// Stop watching the panel.
    pub fn detach(&mut self, host: &mut dyn Host) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.detach(host);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether `id` belongs to this controller.
    pub fn owns(&self, id: ListenerId) -> bool {
        self.trigger_listeners.contains(&id)
            || self.subscription.as_ref().is_some_and(|s| s.owns(id))
    }

    /// Interpret an event heard by listener `id`. `open` says whether the
    /// overlay is currently showing.
    pub fn handle_event(
        &mut self,
        host: &mut dyn Host,
        id: ListenerId,
        event: &HostEvent,
        open: bool,
    ) -> Option<DismissRequest> {
        if self.trigger_listeners.contains(&id) {
            return self.on_trigger(host, event, open);
        }
        let subscription = self.subscription.as_ref().filter(|s| s.owns(id))?;
        if id == subscription.pointer_down {
            let HostEvent::PointerDown { target, .. } = event else {
                return None;
            };
            // a target removed earlier in the same dispatch was re-rendered content
            let outside = !target.is_some_and(|t| !host.is_attached(t) || self.is_inside(host, t));
            let dismissible = self.config.dismissible && self.config.trigger != Trigger::Hover;
            return (dismissible && outside).then_some(DismissRequest::Close);
        }
        if id == subscription.key_down {
            return (self.config.close_on_escape && *event == HostEvent::Key(Key::Escape))
                .then_some(DismissRequest::Close);
        }
        if id == subscription.scroll || id == subscription.resize {
            return Some(DismissRequest::Reposition);
        }
        match event {
            HostEvent::PointerEnter(_) => self.cancel_hover(host),
            HostEvent::PointerLeave(_) => self.schedule_hover(host, HoverIntent::Hide),
            _ => {}
        }
        None
    }

    fn on_trigger(&mut self, host: &mut dyn Host, event: &HostEvent, open: bool) -> Option<DismissRequest> {
        match (self.config.trigger, event) {
            (Trigger::Click, HostEvent::PointerDown { .. }) => Some(DismissRequest::Toggle),
            (Trigger::Hover, HostEvent::PointerEnter(_)) => {
                self.cancel_hover(host);
                if !open {
                    self.schedule_hover(host, HoverIntent::Show);
                }
                None
            }
            (Trigger::Hover, HostEvent::PointerLeave(_)) => {
                self.cancel_hover(host);
                if open {
                    self.schedule_hover(host, HoverIntent::Hide);
                }
                None
            }
            _ => None,
        }
    }

    /// A timer came due; returns the request if it was our hover timer.
    pub fn wake(&mut self, timer: TimerId) -> Option<DismissRequest> {
        match self.hover_timer {
            Some((id, intent)) if id == timer => {
                self.hover_timer = None;
                Some(match intent {
                    HoverIntent::Show => DismissRequest::Show,
                    HoverIntent::Hide => DismissRequest::Close,
                })
            }
            _ => None,
        }
    }

    /// Cancel a pending hover open or close.
    pub fn cancel_hover(&mut self, host: &mut dyn Host) {
        if let Some((id, _)) = self.hover_timer.take() {
            host.clear_timeout(id);
        }
    }

    fn schedule_hover(&mut self, host: &mut dyn Host, intent: HoverIntent) {
        self.cancel_hover(host);
        let id = host.set_timeout(self.config.hover_delay);
        self.hover_timer = Some((id, intent));
    }

    fn is_inside(&self, host: &dyn Host, target: NodeId) -> bool {
        let inside = self.subscription.iter().flat_map(|s| s.inside.iter().copied());
        self.anchor
            .into_iter()
            .chain(inside)
            .chain(self.config.exclude.iter().copied())
            .any(|node| host.contains(node, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchorage_core::{Rect, Size, VirtualDocument, Wakeup};

    struct Fixture {
        doc: VirtualDocument,
        anchor: NodeId,
        panel: NodeId,
        controller: DismissController,
    }

    fn fixture(config: DismissConfig) -> Fixture {
        let mut doc = VirtualDocument::new(Size::new(800.0, 600.0));
        let anchor = doc.create_element("button");
        let panel = doc.create_element("div");
        doc.place(anchor, Rect::new(10.0, 10.0, 50.0, 20.0)).unwrap();
        doc.append_to_root(anchor).unwrap();
        doc.append_to_root(panel).unwrap();
        let mut controller = DismissController::new(config);
        controller.bind(&mut doc, anchor);
        Fixture {
            doc,
            anchor,
            panel,
            controller,
        }
    }

    impl Fixture {
        fn fire(&mut self, event: HostEvent, open: bool) -> Vec<DismissRequest> {
            self.doc
                .dispatch(&event)
                .into_iter()
                .filter_map(|id| self.controller.handle_event(&mut self.doc, id, &event, open))
                .collect()
        }

        fn advance(&mut self, ms: u64) -> Vec<DismissRequest> {
            self.doc
                .advance(Duration::from_millis(ms))
                .into_iter()
                .filter_map(|wakeup| match wakeup {
                    Wakeup::Timer(id) => self.controller.wake(id),
                    Wakeup::Frame(_) => None,
                })
                .collect()
        }

        fn down(&self, target: Option<NodeId>) -> HostEvent {
            HostEvent::PointerDown {
                target,
                x: 0.0,
                y: 0.0,
            }
        }
    }

    #[test]
    fn click_trigger_toggles() {
        let mut f = fixture(DismissConfig::default());
        let press = f.down(Some(f.anchor));
        assert_eq!(f.fire(press, false), vec![DismissRequest::Toggle]);
    }

    #[test]
    fn outside_press_closes_inside_press_does_not() {
        let mut f = fixture(DismissConfig::default());
        f.controller.attach(&mut f.doc, f.panel, None);

        let inside = f.down(Some(f.panel));
        assert!(f.fire(inside, true).is_empty());
        let nowhere = f.down(None);
        assert_eq!(f.fire(nowhere, true), vec![DismissRequest::Close]);
    }

    #[test]
    fn pressing_the_anchor_while_open_only_toggles() {
        let mut f = fixture(DismissConfig::default());
        f.controller.attach(&mut f.doc, f.panel, None);
        let press = f.down(Some(f.anchor));
        assert_eq!(f.fire(press, true), vec![DismissRequest::Toggle]);
    }

    #[test]
    fn excluded_nodes_are_not_outside() {
        let mut doc_f = fixture(DismissConfig::default());
        let toolbar = doc_f.doc.create_element("div");
        doc_f.doc.append_to_root(toolbar).unwrap();
        doc_f.controller.config.exclude.push(toolbar);
        doc_f.controller.attach(&mut doc_f.doc, doc_f.panel, None);
        let press = doc_f.down(Some(toolbar));
        assert!(doc_f.fire(press, true).is_empty());
    }

    #[test]
    fn not_dismissible_ignores_outside_press() {
        let mut f = fixture(DismissConfig {
            dismissible: false,
            ..DismissConfig::default()
        });
        f.controller.attach(&mut f.doc, f.panel, None);
        let nowhere = f.down(None);
        assert!(f.fire(nowhere, true).is_empty());
    }

    #[test]
    fn escape_respects_configuration() {
        let mut f = fixture(DismissConfig::default());
        f.controller.attach(&mut f.doc, f.panel, None);
        assert_eq!(f.fire(HostEvent::Key(Key::Escape), true), vec![DismissRequest::Close]);
        assert!(f.fire(HostEvent::Key(Key::Enter), true).is_empty());

        let mut f = fixture(DismissConfig {
            close_on_escape: false,
            ..DismissConfig::default()
        });
        f.controller.attach(&mut f.doc, f.panel, None);
        assert!(f.fire(HostEvent::Key(Key::Escape), true).is_empty());
    }

    #[test]
    fn scroll_and_resize_request_reposition() {
        let mut f = fixture(DismissConfig::default());
        f.controller.attach(&mut f.doc, f.panel, None);
        assert_eq!(f.fire(HostEvent::Scroll, true), vec![DismissRequest::Reposition]);
        let resize = f.doc.resize(Size::new(400.0, 300.0));
        assert_eq!(f.fire(resize, true), vec![DismissRequest::Reposition]);
    }

    #[test]
    fn detach_removes_every_listener_once() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Hover,
            ..DismissConfig::default()
        });
        let baseline = f.doc.listener_count();
        f.controller.attach(&mut f.doc, f.panel, None);
        assert_eq!(f.doc.listener_count(), baseline + 6);
        f.controller.detach(&mut f.doc);
        f.controller.detach(&mut f.doc);
        assert_eq!(f.doc.listener_count(), baseline);
        assert!(f.fire(HostEvent::Key(Key::Escape), true).is_empty());

        f.controller.unbind(&mut f.doc);
        assert_eq!(f.doc.listener_count(), 0);
    }

    #[test]
    fn subscription_detach_is_idempotent() {
        let mut doc = VirtualDocument::new(Size::new(800.0, 600.0));
        let panel = doc.create_element("div");
        let mut sub = DismissSubscription::attach(&mut doc, vec![panel], None);
        assert_eq!(doc.listener_count(), 4);
        sub.detach(&mut doc);
        assert!(sub.is_disposed());
        sub.detach(&mut doc);
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn hover_opens_after_delay() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Hover,
            ..DismissConfig::default()
        });
        assert!(f.fire(HostEvent::PointerEnter(f.anchor), false).is_empty());
        assert!(f.advance(199).is_empty());
        assert_eq!(f.advance(1), vec![DismissRequest::Show]);
    }

    #[test]
    fn leaving_before_the_delay_cancels_the_open() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Hover,
            ..DismissConfig::default()
        });
        f.fire(HostEvent::PointerEnter(f.anchor), false);
        f.advance(100);
        f.fire(HostEvent::PointerLeave(f.anchor), false);
        assert!(f.advance(500).is_empty());
        assert_eq!(f.doc.pending_timers(), 0);
    }

    #[test]
    fn reentering_cancels_the_pending_close() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Hover,
            ..DismissConfig::default()
        });
        f.controller.attach(&mut f.doc, f.panel, None);
        f.fire(HostEvent::PointerLeave(f.anchor), true);
        f.advance(150);
        f.fire(HostEvent::PointerEnter(f.anchor), true);
        assert!(f.advance(500).is_empty());

        // moving from the anchor onto the panel also keeps it open
        f.fire(HostEvent::PointerLeave(f.anchor), true);
        f.fire(HostEvent::PointerEnter(f.panel), true);
        assert!(f.advance(500).is_empty());

        f.fire(HostEvent::PointerLeave(f.panel), true);
        assert_eq!(f.advance(200), vec![DismissRequest::Close]);
    }

    #[test]
    fn focus_trigger_leaves_open_and_close_to_the_caller() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Focus,
            ..DismissConfig::default()
        });
        assert_eq!(f.doc.listener_count(), 0);
        assert!(f.fire(HostEvent::FocusIn(f.anchor), false).is_empty());
        assert!(f.fire(HostEvent::FocusOut(f.anchor), true).is_empty());
    }

    #[test]
    fn open_time_anchor_is_inside() {
        let mut f = fixture(DismissConfig::default());
        f.controller.unbind(&mut f.doc);
        let other = f.doc.create_element("button");
        f.doc.append_to_root(other).unwrap();
        f.controller.attach(&mut f.doc, f.panel, Some(other));

        let press = f.down(Some(other));
        assert!(f.fire(press, true).is_empty());
        let nowhere = f.down(None);
        assert_eq!(f.fire(nowhere, true), vec![DismissRequest::Close]);
    }

    #[test]
    fn hover_trigger_ignores_outside_press() {
        let mut f = fixture(DismissConfig {
            trigger: Trigger::Hover,
            ..DismissConfig::default()
        });
        f.controller.attach(&mut f.doc, f.panel, Some(f.anchor));
        let nowhere = f.down(None);
        assert!(f.fire(nowhere, true).is_empty());
        assert_eq!(f.fire(HostEvent::Key(Key::Escape), true), vec![DismissRequest::Close]);
    }

    #[test]
    fn manual_trigger_installs_nothing() {
        let f = fixture(DismissConfig {
            trigger: Trigger::Manual,
            ..DismissConfig::default()
        });
        assert_eq!(f.doc.listener_count(), 0);
    }
}
