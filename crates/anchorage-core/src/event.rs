use crate::geometry::Size;
use crate::host::{EventKind, NodeId};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Keys the overlay engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    Tab,
    Backspace,
    Char(char),
    Other,
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Esc => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Up => Key::ArrowUp,
            KeyCode::Down => Key::ArrowDown,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            _ => Key::Other,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        event.code.into()
    }
}

/// Events delivered by a host to the listeners registered on it.
///
/// A driver dispatches each event to the host, receives the ids of the
/// listeners that hear it, and hands the event to the components owning those
/// ids. In the terminal runtime these are produced from crossterm events; see
/// [`HostEvent::from_terminal`].
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A pointer was pressed. `target` is the deepest node under the pointer.
    PointerDown {
        target: Option<NodeId>,
        x: f64,
        y: f64,
    },
    /// A key was pressed.
    Key(Key),
    /// The document scrolled.
    Scroll,
    /// The viewport was resized.
    Resize(Size),
    /// The pointer entered the node.
    PointerEnter(NodeId),
    /// The pointer left the node.
    PointerLeave(NodeId),
    /// Focus moved into the node.
    FocusIn(NodeId),
    /// Focus left the node.
    FocusOut(NodeId),
    /// A CSS transition on the node finished.
    TransitionEnd(NodeId),
}

impl HostEvent {
    /// The listener kind that hears this event.
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::PointerDown { .. } => EventKind::PointerDown,
            HostEvent::Key(_) => EventKind::KeyDown,
            HostEvent::Scroll => EventKind::Scroll,
            HostEvent::Resize(_) => EventKind::Resize,
            HostEvent::PointerEnter(_) => EventKind::PointerEnter,
            HostEvent::PointerLeave(_) => EventKind::PointerLeave,
            HostEvent::FocusIn(_) => EventKind::FocusIn,
            HostEvent::FocusOut(_) => EventKind::FocusOut,
            HostEvent::TransitionEnd(_) => EventKind::TransitionEnd,
        }
    }

    /// The node the event is aimed at, if any.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            HostEvent::PointerDown { target, .. } => *target,
            HostEvent::PointerEnter(node)
            | HostEvent::PointerLeave(node)
            | HostEvent::FocusIn(node)
            | HostEvent::FocusOut(node)
            | HostEvent::TransitionEnd(node) => Some(*node),
            HostEvent::Key(_) | HostEvent::Scroll | HostEvent::Resize(_) => None,
        }
    }

    /// Whether the event propagates from its target to the target's ancestors.
    pub fn bubbles(&self) -> bool {
        matches!(
            self,
            HostEvent::PointerDown { .. } | HostEvent::FocusIn(_) | HostEvent::FocusOut(_)
        )
    }

    /// Translate the host-independent part of a terminal event.
    ///
    /// Mouse events need hit-testing against a document and are handled by
    /// [`VirtualDocument::pointer_events`](crate::document::VirtualDocument::pointer_events).
    /// Key releases and repeats are dropped.
    pub fn from_terminal(event: &crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                Some(HostEvent::Key((*key).into()))
            }
            crossterm::event::Event::Resize(w, h) => {
                Some(HostEvent::Resize(Size::new(f64::from(*w), f64::from(*h))))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn key_codes_map() {
        assert_eq!(Key::from(KeyCode::Esc), Key::Escape);
        assert_eq!(Key::from(KeyCode::Char(' ')), Key::Space);
        assert_eq!(Key::from(KeyCode::Char('x')), Key::Char('x'));
        assert_eq!(Key::from(KeyCode::F(1)), Key::Other);
    }

    #[test]
    fn terminal_key_press_becomes_host_key() {
        let event = crossterm::event::Event::Key(press(KeyCode::Esc));
        assert_eq!(HostEvent::from_terminal(&event), Some(HostEvent::Key(Key::Escape)));
    }

    #[test]
    fn terminal_key_release_is_dropped() {
        let mut key = press(KeyCode::Esc);
        key.kind = KeyEventKind::Release;
        let event = crossterm::event::Event::Key(key);
        assert_eq!(HostEvent::from_terminal(&event), None);
    }

    #[test]
    fn terminal_resize_becomes_viewport_size() {
        let event = crossterm::event::Event::Resize(80, 24);
        assert_eq!(
            HostEvent::from_terminal(&event),
            Some(HostEvent::Resize(Size::new(80.0, 24.0)))
        );
    }

    #[test]
    fn bubbling_and_targets() {
        let down = HostEvent::PointerDown {
            target: Some(NodeId(4)),
            x: 0.0,
            y: 0.0,
        };
        assert!(down.bubbles());
        assert_eq!(down.target(), Some(NodeId(4)));
        assert!(!HostEvent::PointerEnter(NodeId(4)).bubbles());
        assert_eq!(HostEvent::Scroll.target(), None);
        assert_eq!(HostEvent::Key(Key::Escape).kind(), EventKind::KeyDown);
    }
}
